//! Sandbox Setup
//!
//! Spawns fixture entities into the sandbox world.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;

use overlook_model::{
    generate_item_id, ColliderFixture, ContainerFixture, DoorFixture, EntityKind, ItemFixture,
    ParticipantFixture, Rgba, Vec3, ZoneFixture,
};

use super::components::*;
use crate::host::ItemInfo;

/// Named physics layers known to the sandbox.
pub const LAYERS: [(&str, u8); 4] = [("default", 0), ("participant", 8), ("static", 11), ("terrain", 12)];

pub fn layer_index(name: &str) -> Option<u8> {
    LAYERS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, i)| *i)
}

/// Spawn `count` renderer surfaces for `owner` and attach the list.
fn attach_surfaces(world: &mut World, owner: Entity, count: u8, color: Rgba) {
    let mut surfaces = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let material = world
            .resource_mut::<MaterialRegistry>()
            .register(MaterialProps::standard(color));
        let surface = world
            .spawn(RenderSurface {
                owner,
                base: material,
                material,
                forced_invisible: false,
                occlusion_culling: true,
                reject_writes: false,
            })
            .id();
        surfaces.push(surface);
    }
    world.entity_mut(owner).insert(SurfaceList(surfaces));
}

pub fn spawn_participant(world: &mut World, rng: &mut SmallRng, fixture: &ParticipantFixture) -> Entity {
    let stable_id = fixture
        .profile_id
        .clone()
        .unwrap_or_else(|| generate_item_id(rng.gen()));
    let mut entity = world.spawn((
        Kind(EntityKind::Participant),
        Position(fixture.position),
        Vitals {
            alive: fixture.alive,
        },
        Identity::new(fixture.name.clone(), stable_id),
        Allegiance {
            faction: fixture.faction,
            role: fixture.role,
        },
        Active(fixture.active),
        Collider {
            half_extents: Vec3::new(0.3, 0.9, 0.3),
            offset: Vec3::new(0.0, 0.9, 0.0),
            layer: 8,
        },
    ));
    if let Some(head) = fixture.head {
        entity.insert(HeadBone(head));
    }
    let id = entity.id();
    attach_surfaces(world, id, fixture.surfaces, Rgba::WHITE);
    id
}

pub fn spawn_item(world: &mut World, fixture: &ItemFixture) -> Entity {
    let mut entity = world.spawn((
        Kind(EntityKind::LooseItem),
        Position(fixture.position),
        Identity::new(fixture.name.clone(), fixture.item_id.clone()),
        Active(true),
    ));
    if fixture.examined {
        entity.insert(Examined);
    }
    let id = entity.id();
    attach_surfaces(world, id, 1, Rgba::WHITE);
    id
}

pub fn spawn_container(world: &mut World, rng: &mut SmallRng, fixture: &ContainerFixture) -> Entity {
    let contents = fixture
        .contents
        .iter()
        .map(|item| ItemInfo {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
        })
        .collect();
    world
        .spawn((
            Kind(EntityKind::Container),
            Position(fixture.position),
            Identity::new(fixture.name.clone(), generate_item_id(rng.gen())),
            Contents(contents),
            Active(true),
        ))
        .id()
}

pub fn spawn_zone(world: &mut World, fixture: &ZoneFixture) -> Entity {
    world
        .spawn((
            Kind(EntityKind::Zone),
            Position(fixture.position),
            Identity::new(fixture.name.clone(), fixture.zone_id.clone()),
        ))
        .id()
}

pub fn spawn_door(world: &mut World, fixture: &DoorFixture) -> Entity {
    world
        .spawn((
            Kind(EntityKind::Door),
            Position(fixture.position),
            Identity::new(fixture.name.clone(), fixture.lock_class.clone()),
            Lock {
                class: fixture.lock_class.clone(),
                locked: fixture.locked,
            },
            Active(true),
        ))
        .id()
}

pub fn spawn_collider(world: &mut World, index: usize, fixture: &ColliderFixture) -> Entity {
    let layer = layer_index(&fixture.layer).unwrap_or_else(|| {
        tracing::warn!("Unknown collider layer '{}', using default", fixture.layer);
        0
    });
    world
        .spawn((
            Kind(EntityKind::Obstacle),
            Position(fixture.center),
            Identity::new("Collider", format!("collider_{}", index)),
            Collider {
                half_extents: fixture.half_extents,
                offset: Vec3::ZERO,
                layer,
            },
        ))
        .id()
}
