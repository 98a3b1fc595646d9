//! Integration tests for one-shot actions.

use overlook_core::{
    Action, ActionReport, Feature, Interact, OverlayEngine, RelocateCategory, Sandbox,
};
use overlook_model::{fixtures, Vec3};

/// Unlocking matches the lock class case-insensitively and only once.
#[test]
fn test_unlock_by_class() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let office = sandbox.find("Office Door").unwrap();
    let vault = sandbox.find("Vault Door").unwrap();

    let action = Action::Unlock {
        class: "OFFICE_KEY".into(),
    };
    let report = engine.run_action(&mut sandbox, &action);
    assert_eq!(
        report,
        ActionReport {
            affected: 1,
            skipped: 0
        }
    );
    assert!(!sandbox.is_locked(office).unwrap());
    assert!(sandbox.is_locked(vault).unwrap());

    // Already unlocked
    let report = engine.run_action(&mut sandbox, &action);
    assert_eq!(report.affected, 0);
}

/// Relocation moves every live entity of the category.
#[test]
fn test_relocate_items() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let to = Vec3::new(1.0, 0.0, 5.0);

    let report = engine.run_action(
        &mut sandbox,
        &Action::Relocate {
            category: RelocateCategory::LooseItems,
            to,
        },
    );
    assert_eq!(report.affected, 4);
    assert_eq!(sandbox.position(sandbox.find("Ammo Box").unwrap()), Some(to));
    // Participants stay put
    assert_ne!(sandbox.position(sandbox.find("Raider").unwrap()), Some(to));
}

/// Participant relocation skips the viewer and the dead, and moves heads too.
#[test]
fn test_relocate_participants() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let viewer = sandbox.find("Viewer").unwrap();
    let to = Vec3::new(0.0, 0.0, 12.0);

    let report = engine.run_action(
        &mut sandbox,
        &Action::Relocate {
            category: RelocateCategory::Participants,
            to,
        },
    );
    assert_eq!(report.affected, 7);
    assert_eq!(sandbox.position(viewer), Some(Vec3::ZERO));
    assert_ne!(sandbox.position(sandbox.find("Fallen").unwrap()), Some(to));
}

/// A faulting entity is skipped and counted.
#[test]
fn test_relocate_skips_faults() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let bolts = sandbox.find("Bolts").unwrap();
    sandbox.break_entity(bolts);

    let report = engine.run_action(
        &mut sandbox,
        &Action::Relocate {
            category: RelocateCategory::LooseItems,
            to: Vec3::ZERO,
        },
    );
    assert_eq!(report.affected, 3);
    assert_eq!(report.skipped, 1);
    assert!(engine.faults().has_seen(Feature::Actions, "position"));
}
