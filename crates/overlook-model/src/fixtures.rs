//! Sample data fixtures for testing.
//!
//! This module provides ready-made worlds for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // overlook-model = { path = "../overlook-model", features = ["test-fixtures"] }
//!
//! use overlook_model::fixtures;
//!
//! let world = fixtures::sample_world();
//! ```

use crate::{Faction, ParticipantFixture, Vec3, WorldFixture};

/// Returns the sample world from the fixtures file.
///
/// The viewer stands at the origin looking down +Z and contains:
/// - 8 other participants (one dead, one beyond 300m, one behind the
///   viewer, one hidden behind a wall)
/// - 4 loose items, 2 containers, 2 zones, 2 doors
/// - 3 objectives (active, completable, completed)
pub fn sample_world() -> WorldFixture {
    let json = include_str!("../tests/fixtures/sample_world.json");
    WorldFixture::from_json(json).expect("Failed to parse sample_world.json")
}

/// A viewer at the origin with one hostile participant `distance` metres
/// straight ahead.
pub fn single_participant(distance: f32) -> WorldFixture {
    WorldFixture {
        viewer: Some(
            ParticipantFixture::new("Viewer", Vec3::ZERO, Faction::Blue)
                .with_head(Vec3::new(0.0, 1.7, 0.0)),
        ),
        participants: vec![ParticipantFixture::new(
            "Target",
            Vec3::new(0.0, 0.0, distance),
            Faction::Unaligned,
        )],
        ..WorldFixture::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjectiveStatus, Role};

    #[test]
    fn test_sample_world_loads() {
        let world = sample_world();
        assert!(world.viewer.is_some());
        assert_eq!(world.participants.len(), 8);
        assert_eq!(world.items.len(), 4);
        assert_eq!(world.containers.len(), 2);
        assert_eq!(world.zones.len(), 2);
        assert_eq!(world.doors.len(), 2);
        assert_eq!(world.colliders.len(), 1);
        assert_eq!(world.objectives.len(), 3);

        let warlord = world
            .participants
            .iter()
            .find(|p| p.name == "Warlord")
            .unwrap();
        assert_eq!(warlord.role, Role::Elite);
        assert_eq!(warlord.surfaces, 2);

        assert_eq!(world.objectives[1].status, ObjectiveStatus::Completable);
    }

    #[test]
    fn test_single_participant() {
        let world = single_participant(50.0);
        assert_eq!(world.participants[0].position.z, 50.0);
        assert_eq!(world.entity_count(), 2);
    }
}
