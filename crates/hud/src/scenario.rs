//! Random world generation for headless runs.

use rand::rngs::SmallRng;
use rand::Rng;

use overlook_model::{
    generate_item_id, ColliderFixture, ContainerFixture, DoorFixture, Faction, ItemFixture,
    Objective, ObjectiveCondition, ObjectiveStatus, ParticipantFixture, Role, Vec3, WorldFixture,
    ZoneFixture,
};

const ITEM_TEMPLATES: [(&str, &str); 6] = [
    ("bolts", "Bolts"),
    ("wires", "Wires"),
    ("ledger", "Bank Ledger"),
    ("beacon", "Signal Beacon"),
    ("medkit", "Medkit"),
    ("fuel", "Fuel Canister"),
];

const HEAD_HEIGHT: f32 = 1.7;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioOptions {
    /// Number of non-viewer entities to spawn
    pub entities: usize,
    /// Entities are placed within this many units of the viewer on X, and
    /// up to this far in front of it on Z
    pub extent: f32,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            entities: 60,
            extent: 300.0,
        }
    }
}

fn random_position(rng: &mut SmallRng, extent: f32) -> Vec3 {
    let extent = extent.max(1.0);
    Vec3::new(
        rng.gen_range(-extent..extent),
        0.0,
        rng.gen_range(-extent * 0.2..extent * 1.5),
    )
}

fn random_item(rng: &mut SmallRng, position: Vec3) -> ItemFixture {
    let (item_id, name) = ITEM_TEMPLATES[rng.gen_range(0..ITEM_TEMPLATES.len())];
    let item = ItemFixture::new(item_id, name, position);
    if rng.gen_bool(0.5) {
        item.examined()
    } else {
        item
    }
}

fn random_participant(rng: &mut SmallRng, index: usize, position: Vec3) -> ParticipantFixture {
    let faction = match rng.gen_range(0..4) {
        0 => Faction::Blue,
        1 => Faction::Red,
        _ => Faction::Unaligned,
    };
    let role = if rng.gen_bool(0.15) { Role::Elite } else { Role::Standard };
    let mut fixture = ParticipantFixture::new(format!("Participant {}", index), position, faction)
        .with_role(role)
        .with_head(position + Vec3::new(0.0, HEAD_HEIGHT, 0.0));
    fixture.profile_id = Some(generate_item_id(rng.gen()));
    fixture.surfaces = rng.gen_range(1..=3);
    if rng.gen_bool(0.1) {
        fixture = fixture.dead();
    }
    fixture
}

/// Build a world with a viewer at the origin and `options.entities` other
/// entities scattered in front of it.
pub fn random_world(rng: &mut SmallRng, options: &ScenarioOptions) -> WorldFixture {
    let mut world = WorldFixture {
        viewer: Some(
            ParticipantFixture::new("Viewer", Vec3::ZERO, Faction::Blue)
                .with_head(Vec3::new(0.0, HEAD_HEIGHT, 0.0)),
        ),
        ..WorldFixture::default()
    };

    for index in 0..options.entities {
        let position = random_position(rng, options.extent);
        match rng.gen_range(0..20) {
            0..=9 => world
                .participants
                .push(random_participant(rng, index, position)),
            10..=15 => world.items.push(random_item(rng, position)),
            16 | 17 => {
                let count = rng.gen_range(0..4);
                let contents = (0..count)
                    .map(|_| random_item(rng, Vec3::ZERO))
                    .collect();
                world.containers.push(ContainerFixture {
                    name: format!("Crate {}", index),
                    position,
                    contents,
                });
            }
            18 => world.zones.push(ZoneFixture {
                zone_id: format!("zone_{}", index),
                name: format!("Zone {}", index),
                position,
            }),
            _ => {
                if rng.gen_bool(0.5) {
                    world.doors.push(DoorFixture {
                        name: format!("Door {}", index),
                        lock_class: "office_key".into(),
                        position,
                        locked: true,
                    });
                } else {
                    world.colliders.push(ColliderFixture {
                        center: position + Vec3::new(0.0, 1.0, 0.0),
                        half_extents: Vec3::new(rng.gen_range(1.0..6.0), 2.0, 0.5),
                        layer: "static".into(),
                    });
                }
            }
        }
    }

    let mut courier = Objective::new("obj_courier", "Courier", ObjectiveStatus::Active)
        .with_condition(ObjectiveCondition::FindItem {
            item_ids: vec!["ledger".into()],
        });
    if let Some(zone) = world.zones.first() {
        courier = courier.with_condition(ObjectiveCondition::VisitZone {
            zone_id: zone.zone_id.clone(),
        });
    }
    world.objectives.push(courier);
    world
}
