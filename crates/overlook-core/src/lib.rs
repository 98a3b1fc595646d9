//! Overlay engine: target discovery, visual overrides, distance culling and
//! forced tuning scalars over an abstract host.

pub mod actions;
pub mod camera;
pub mod chams;
pub mod config;
pub mod context;
pub mod culling;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod fault;
pub mod filter;
pub mod host;
pub mod ownership;
pub mod projection;
pub mod sandbox;
pub mod sight;
pub mod throttle;
pub mod toggle;

pub use actions::{run_action, Action, ActionReport, RelocateCategory};
pub use camera::PerspectiveCamera;
pub use chams::{OverrideCategory, OverrideEngine, OVERLAY_RENDER_QUEUE, OVERRIDE_SHADER};
pub use config::{default_config_toml, ChamsMode, OverlayConfig};
pub use context::TickContext;
pub use culling::{CullingEngine, KEEP_ALIVE_MARGIN};
pub use discovery::{Discovery, TargetLists};
pub use engine::{EngineStats, OverlayEngine};
pub use error::{ConfigError, HostError, HostResult};
pub use fault::{FaultLog, Feature};
pub use filter::NameFilter;
pub use host::{
    Activation, Camera, EntityView, Host, Interact, Physics, Snapshot, Surfaces, Tuning, TuningKey,
};
pub use ownership::OwnershipMap;
pub use projection::{is_on_screen, project, Projection};
pub use sandbox::Sandbox;
pub use sight::LineOfSight;
pub use throttle::Throttle;
pub use toggle::{ForcedToggle, ToggleEdge, TuningOverrides};
