//! Host Interfaces
//!
//! Everything the engine reads or writes lives in the host process. These
//! traits are the whole surface the engine touches; handles are opaque and
//! only compared for identity. A handle seen on an earlier tick may have been
//! destroyed since, so every consumer re-checks [`Snapshot::is_valid`] before
//! dereferencing it.

use std::fmt::Debug;
use std::hash::Hash;

use overlook_model::{EntityKind, Faction, Objective, Rgba, Role, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::HostResult;

/// Read-only view of one entity for the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub kind: EntityKind,
    /// Base transform position
    pub position: Vec3,
    /// Head bone position, for participants that have one
    pub head: Option<Vec3>,
    pub alive: bool,
    pub name: String,
    /// Stable identifier (profile id for participants, template id for items)
    pub stable_id: String,
    pub faction: Option<Faction>,
    pub role: Role,
    /// Whether the viewer has examined this kind of item
    pub examined: bool,
}

/// One entry inside a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInfo {
    pub item_id: String,
    pub name: String,
}

/// The world snapshot for the current tick.
pub trait Snapshot {
    type Handle: Copy + Ord + Hash + Debug;

    /// All live entity handles, in no particular order.
    fn entities(&self) -> Vec<Self::Handle>;

    /// The local viewpoint, if one exists this tick.
    fn viewer(&self) -> Option<Self::Handle>;

    /// False once the handle has been destroyed.
    fn is_valid(&self, handle: Self::Handle) -> bool;

    fn describe(&self, handle: Self::Handle) -> HostResult<EntityView>;

    fn container_contents(&self, handle: Self::Handle) -> HostResult<Vec<ItemInfo>>;

    /// The viewer's objective list.
    fn viewer_objectives(&self) -> HostResult<Vec<Objective>>;
}

/// Bit mask of physics layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

/// Result of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<H> {
    pub point: Vec3,
    /// Root entity of the collider that was hit, if it belongs to one
    pub root: Option<H>,
}

/// Ray casting against host geometry.
pub trait Physics: Snapshot {
    /// Resolve named layers into a mask. `None` when any name is unknown.
    fn resolve_layer_mask(&self, layers: &[&str]) -> Option<LayerMask>;

    /// First hit on the segment `from -> to` against colliders in `mask`.
    fn raycast(&self, from: Vec3, to: Vec3, mask: LayerMask) -> Option<RayHit<Self::Handle>>;
}

/// Identity of a material instance owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u64);

/// Identity of a shader owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderId(pub u32);

/// Depth comparison used by a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthTest {
    LessEqual,
    Always,
}

/// Which faces a material draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceCull {
    Back,
    /// Cull front faces, drawing back faces only
    Front,
}

/// Material written over a surface while it is overridden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideMaterial {
    pub shader: ShaderId,
    pub color: Rgba,
    pub depth_test: DepthTest,
    pub depth_write: bool,
    pub render_queue: i32,
}

/// Scaled back-face duplicate drawn around an overridden surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSpec {
    pub shader: ShaderId,
    pub color: Rgba,
    pub scale: f32,
    pub cull: FaceCull,
}

/// Renderer surfaces and their material slots.
pub trait Surfaces: Snapshot {
    type Surface: Copy + Ord + Hash + Debug;
    type Outline: Copy + Eq + Debug;

    /// Renderer surfaces belonging to an entity.
    fn surfaces(&self, owner: Self::Handle) -> HostResult<Vec<Self::Surface>>;

    /// False once the surface has been destroyed.
    fn surface_valid(&self, surface: Self::Surface) -> bool;

    fn resolve_shader(&self, name: &str) -> Option<ShaderId>;

    fn material(&self, surface: Self::Surface) -> HostResult<MaterialId>;

    fn apply_override(
        &mut self,
        surface: Self::Surface,
        material: &OverrideMaterial,
    ) -> HostResult<()>;

    fn restore_material(&mut self, surface: Self::Surface, original: MaterialId)
        -> HostResult<()>;

    fn set_forced_invisible(&mut self, surface: Self::Surface, invisible: bool)
        -> HostResult<()>;

    fn set_occlusion_culling(&mut self, surface: Self::Surface, enabled: bool)
        -> HostResult<()>;

    fn spawn_outline(
        &mut self,
        surface: Self::Surface,
        spec: &OutlineSpec,
    ) -> HostResult<Self::Outline>;

    fn recolor_outline(&mut self, outline: Self::Outline, color: Rgba) -> HostResult<()>;

    fn destroy_outline(&mut self, outline: Self::Outline);
}

/// Per-entity activation flag.
pub trait Activation: Snapshot {
    fn is_active(&self, handle: Self::Handle) -> HostResult<bool>;

    fn set_active(&mut self, handle: Self::Handle, active: bool) -> HostResult<()>;
}

/// Global scalars the engine can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningKey {
    /// Height threshold below which falls are harmless
    SafetyThreshold,
    /// Global simulation time scale
    TimeScale,
    /// Locomotion mode selector
    LocomotionMode,
    /// Scale applied to the head bone of other participants
    BoneScale,
    FieldOfView,
    AmbientBoost,
}

impl TuningKey {
    pub const ALL: [TuningKey; 6] = [
        TuningKey::SafetyThreshold,
        TuningKey::TimeScale,
        TuningKey::LocomotionMode,
        TuningKey::BoneScale,
        TuningKey::FieldOfView,
        TuningKey::AmbientBoost,
    ];

    /// The value the host uses when nothing overrides it.
    pub fn default_value(self) -> f32 {
        match self {
            TuningKey::SafetyThreshold => 3.0,
            TuningKey::TimeScale => 1.0,
            TuningKey::LocomotionMode => 0.0,
            TuningKey::BoneScale => 1.0,
            TuningKey::FieldOfView => 75.0,
            TuningKey::AmbientBoost => 0.0,
        }
    }
}

pub trait Tuning {
    fn write_tuning(&mut self, key: TuningKey, value: f32) -> HostResult<()>;
}

/// Interaction entry points used by one-shot actions.
pub trait Interact: Snapshot {
    /// Lock class of a lockable object, `None` when it is not lockable.
    fn lock_class(&self, handle: Self::Handle) -> HostResult<Option<String>>;

    fn is_locked(&self, handle: Self::Handle) -> HostResult<bool>;

    fn set_locked(&mut self, handle: Self::Handle, locked: bool) -> HostResult<()>;

    fn teleport(&mut self, handle: Self::Handle, to: Vec3) -> HostResult<()>;
}

/// Everything the engine needs from the host.
pub trait Host: Physics + Surfaces + Activation + Tuning + Interact {}

impl<T> Host for T where T: Physics + Surfaces + Activation + Tuning + Interact {}

/// Camera used for projection.
pub trait Camera {
    /// Project a world point to pixels, origin bottom-left.
    ///
    /// The returned `z` is the view depth; positive means in front.
    fn world_to_screen(&self, point: Vec3) -> Vec3;

    fn position(&self) -> Vec3;

    fn forward(&self) -> Vec3;

    /// Screen size in pixels.
    fn screen_size(&self) -> Vec2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_contains() {
        let mask = LayerMask((1 << 0) | (1 << 11));
        assert!(mask.contains(0));
        assert!(mask.contains(11));
        assert!(!mask.contains(12));
        assert!(!mask.contains(40));
    }

    #[test]
    fn test_tuning_defaults_cover_all_keys() {
        for key in TuningKey::ALL {
            assert!(key.default_value().is_finite());
        }
        assert_eq!(TuningKey::TimeScale.default_value(), 1.0);
    }
}
