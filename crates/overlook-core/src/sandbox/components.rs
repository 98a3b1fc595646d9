//! Sandbox Components
//!
//! ECS components and resources backing the in-memory host.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use overlook_model::{EntityKind, Faction, Objective, Rgba, Role, Vec3};

use crate::host::{DepthTest, ItemInfo, MaterialId, OutlineSpec, ShaderId, TuningKey};

/// Component: What an entity is. Entities without it are renderer parts.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kind(pub EntityKind);

/// Component: Base transform position
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

/// Component: Head bone position
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HeadBone(pub Vec3);

/// Component: Life state of a participant
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub alive: bool,
}

/// Component: Display name and stable identifier
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub stable_id: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, stable_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stable_id: stable_id.into(),
        }
    }
}

/// Component: Faction and role of a participant
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allegiance {
    pub faction: Faction,
    pub role: Role,
}

/// Component: Activation flag
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Active(pub bool);

/// Component: Marker for item kinds the viewer has examined
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Examined;

/// Component: Items held by a container
#[derive(Component, Debug, Clone, Default)]
pub struct Contents(pub Vec<ItemInfo>);

/// Component: Lock on a static object
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub class: String,
    pub locked: bool,
}

/// Component: Box collider centered on the entity position
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec3,
    pub offset: Vec3,
    pub layer: u8,
}

/// Component: Renderer surfaces owned by an entity
#[derive(Component, Debug, Clone, Default)]
pub struct SurfaceList(pub Vec<Entity>);

/// Component: One renderer surface
#[derive(Component, Debug, Clone, PartialEq)]
pub struct RenderSurface {
    pub owner: Entity,
    /// Material assigned at spawn
    pub base: MaterialId,
    pub material: MaterialId,
    pub forced_invisible: bool,
    pub occlusion_culling: bool,
    /// Fault injection: refuse material writes
    pub reject_writes: bool,
}

/// Component: Back-face outline duplicate of a surface
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OutlineShell {
    pub surface: Entity,
    pub spec: OutlineSpec,
}

/// Render state of a material instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProps {
    pub shader: ShaderId,
    pub color: Rgba,
    pub depth_test: DepthTest,
    pub depth_write: bool,
    pub render_queue: i32,
}

/// Shader every spawned surface starts with.
pub const STANDARD_SHADER: ShaderId = ShaderId(1);

/// Render queue of opaque geometry.
pub const GEOMETRY_QUEUE: i32 = 2000;

impl MaterialProps {
    pub fn standard(color: Rgba) -> Self {
        Self {
            shader: STANDARD_SHADER,
            color,
            depth_test: DepthTest::LessEqual,
            depth_write: true,
            render_queue: GEOMETRY_QUEUE,
        }
    }
}

/// Resource: Every material instance created in the session
#[derive(Resource, Debug, Default)]
pub struct MaterialRegistry {
    next: u64,
    materials: HashMap<MaterialId, MaterialProps>,
}

impl MaterialRegistry {
    pub fn register(&mut self, props: MaterialProps) -> MaterialId {
        self.next += 1;
        let id = MaterialId(self.next);
        self.materials.insert(id, props);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialProps> {
        self.materials.get(&id)
    }
}

/// Resource: Global tuning scalars and the log of engine writes
#[derive(Resource, Debug)]
pub struct TuningValues {
    pub values: HashMap<TuningKey, f32>,
    pub writes: Vec<(TuningKey, f32)>,
}

impl Default for TuningValues {
    fn default() -> Self {
        Self {
            values: TuningKey::ALL
                .iter()
                .map(|k| (*k, k.default_value()))
                .collect(),
            writes: Vec::new(),
        }
    }
}

/// Resource: The viewer's objective list
#[derive(Resource, Debug, Clone, Default)]
pub struct Objectives(pub Vec<Objective>);
