//! Shared data types for the overlay engine.
//!
//! This crate contains pure data structures with no engine logic.
//! It is a dependency for all other crates in the workspace.

pub mod classify;
pub mod color;
pub mod fixture;
pub mod geometry;
pub mod objective;
pub mod records;
pub mod timestamp;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export geometry types
pub use geometry::{distance, offset_toward, Aabb, Vec2, Vec3};

// Re-export color types
pub use color::Rgba;

// Re-export timestamp types
pub use timestamp::FrameTime;

// Re-export classification types
pub use classify::{EntityKind, Faction, ParticipantClass, Role};

// Re-export objective types
pub use objective::{
    interesting_items, interesting_zones, Objective, ObjectiveCondition, ObjectiveStatus,
};

// Re-export record types
pub use records::{ObjectCategory, ObjectRecord, ParticipantRecord, QuestRecord, TargetRecord};

// Re-export fixture types
pub use fixture::{
    generate_item_id, ColliderFixture, ContainerFixture, DoorFixture, ItemFixture,
    ParticipantFixture, WorldFixture, ZoneFixture,
};
