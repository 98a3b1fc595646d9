//! Integration tests for target discovery against the sandbox host.

use overlook_core::{
    Feature, NameFilter, OverlayConfig, OverlayEngine, PerspectiveCamera, Sandbox,
};
use overlook_model::{
    fixtures, FrameTime, ObjectRecord, ParticipantClass, Rgba, TargetRecord, Vec3,
};

fn start(config: &OverlayConfig) -> (Sandbox, OverlayEngine<Sandbox>) {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    engine.tick(
        &mut sandbox,
        &PerspectiveCamera::default(),
        config,
        FrameTime::new(0, 0.0),
    );
    (sandbox, engine)
}

fn names(records: &[TargetRecord]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .map(|r| match r {
            TargetRecord::Participant(p) => p.name.clone(),
            TargetRecord::Object(o) => o.name.clone(),
            TargetRecord::Quest(q) => q.name.clone(),
        })
        .collect();
    names.sort();
    names
}

fn objects(records: &[TargetRecord]) -> Vec<&ObjectRecord> {
    records
        .iter()
        .filter_map(|r| match r {
            TargetRecord::Object(o) => Some(o),
            _ => None,
        })
        .collect()
}

/// Dead, distant, off-screen participants and the viewer are excluded.
#[test]
fn test_sample_world_participants() {
    let (_, engine) = start(&OverlayConfig::default());
    assert_eq!(
        names(&engine.targets().participants),
        vec!["Hidden", "Raider", "Scav", "Teammate", "Warlord"]
    );
}

/// Classification and colors follow faction, then role.
#[test]
fn test_participant_classes() {
    let (_, engine) = start(&OverlayConfig::default());
    let class_of = |name: &str| {
        engine
            .targets()
            .participants
            .iter()
            .find_map(|r| match r {
                TargetRecord::Participant(p) if p.name == name => Some((p.class, p.color)),
                _ => None,
            })
            .unwrap()
    };

    assert_eq!(class_of("Teammate"), (ParticipantClass::Blue, Rgba::BLUE));
    assert_eq!(class_of("Raider"), (ParticipantClass::Red, Rgba::RED));
    assert_eq!(class_of("Scav"), (ParticipantClass::Hostile, Rgba::ORANGE));
    assert_eq!(class_of("Warlord"), (ParticipantClass::Elite, Rgba::MAGENTA));
}

/// Records carry top-left screen coordinates and viewer distance.
#[test]
fn test_participant_record_geometry() {
    let (_, engine) = start(&OverlayConfig::default());
    let warlord = engine
        .targets()
        .participants
        .iter()
        .find(|r| matches!(r, TargetRecord::Participant(p) if p.name == "Warlord"))
        .unwrap();

    assert!((warlord.distance() - 90.0).abs() < 1e-3);
    // Straight ahead, slightly above the eye line
    assert!((warlord.screen().x - 960.0).abs() < 1.0);
    assert!(warlord.screen().y < 540.0);
}

/// Visible-only drops participants behind static geometry.
#[test]
fn test_visible_only_drops_occluded() {
    let mut config = OverlayConfig::default();
    config.participants.visible_only = true;
    let (_, engine) = start(&config);
    assert_eq!(
        names(&engine.targets().participants),
        vec!["Raider", "Scav", "Teammate", "Warlord"]
    );
}

/// A participant whose own collider is the first hit still counts as visible.
#[test]
fn test_hit_on_target_itself_is_visible() {
    let mut config = OverlayConfig::default();
    config.participants.visible_only = true;

    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let raider = sandbox.find("Raider").unwrap();
    sandbox.attach_collider(raider, Vec3::new(0.5, 3.0, 0.5), "static");

    let mut engine = OverlayEngine::new(&sandbox);
    engine.tick(
        &mut sandbox,
        &PerspectiveCamera::default(),
        &config,
        FrameTime::new(0, 0.0),
    );
    assert!(names(&engine.targets().participants).contains(&"Raider".to_string()));
}

/// Unresolvable layers fall back to the fixed mask, which still covers the
/// static layer.
#[test]
fn test_line_of_sight_fallback_mask() {
    use overlook_core::sandbox::SandboxOptions;

    let mut config = OverlayConfig::default();
    config.participants.visible_only = true;

    let mut sandbox = Sandbox::from_fixture_with(
        &fixtures::sample_world(),
        SandboxOptions::default().without_layers(),
    );
    let mut engine = OverlayEngine::new(&sandbox);
    assert!(engine.line_of_sight().is_fallback());

    engine.tick(
        &mut sandbox,
        &PerspectiveCamera::default(),
        &config,
        FrameTime::new(0, 0.0),
    );
    assert!(!names(&engine.targets().participants).contains(&"Hidden".to_string()));
}

/// A participant at 50m is shown with a 100m limit; at 150m it is not.
#[test]
fn test_participant_max_distance() {
    let mut config = OverlayConfig::default();
    config.participants.max_distance = 100.0;

    for (distance, expected) in [(50.0, 1), (150.0, 0)] {
        let mut sandbox = Sandbox::from_fixture(&fixtures::single_participant(distance));
        let mut engine = OverlayEngine::new(&sandbox);
        engine.tick(
            &mut sandbox,
            &PerspectiveCamera::default(),
            &config,
            FrameTime::new(0, 0.0),
        );
        assert_eq!(
            engine.targets().participants.len(),
            expected,
            "participant at {}m",
            distance
        );
    }
}

/// Raising the max distance never removes a target.
#[test]
fn test_distance_monotonicity() {
    let mut previous: Vec<String> = Vec::new();
    for max in [10.0, 25.0, 50.0, 100.0, 300.0, 1000.0] {
        let mut config = OverlayConfig::default();
        config.participants.max_distance = max;
        config.loose_items.max_distance = max;
        let (_, engine) = start(&config);

        let mut current = names(&engine.targets().participants);
        current.extend(names(&engine.targets().loose_items));
        for name in &previous {
            assert!(current.contains(name), "{} dropped at {}m", name, max);
        }
        previous = current;
    }
    assert!(previous.contains(&"Far Scout".to_string()));
    assert!(previous.contains(&"Ammo Box".to_string()));
}

/// Loose items within range are listed, unfiltered by default.
#[test]
fn test_loose_items_default() {
    let (_, engine) = start(&OverlayConfig::default());
    assert_eq!(
        names(&engine.targets().loose_items),
        vec!["Bank Ledger", "Bolts", "Signal Beacon"]
    );
    for record in objects(&engine.targets().loose_items) {
        assert_eq!(record.color, Rgba::GREEN);
        assert!(record.detail.is_none());
    }
}

/// The filter matches display names or identifiers, case-insensitively.
#[test]
fn test_loose_item_filter() {
    let mut config = OverlayConfig::default();
    config.loose_items.filter = "LEDGER, beacon".into();
    let (_, engine) = start(&config);
    assert_eq!(
        names(&engine.targets().loose_items),
        vec!["Bank Ledger", "Signal Beacon"]
    );

    config.loose_items.filter = " , bolts ,".into();
    let (_, engine) = start(&config);
    assert_eq!(names(&engine.targets().loose_items), vec!["Bolts"]);
}

/// Blank filter terms are dropped and an empty filter matches everything.
#[test]
fn test_filter_parsing() {
    let filter = NameFilter::parse("a, ,b");
    assert_eq!(filter.terms(), &["a".to_string(), "b".to_string()]);

    let empty = NameFilter::parse(" , ");
    assert!(empty.is_empty());
    assert!(empty.matches("Anything", "anything"));
}

/// Known-only keeps items the viewer has examined.
#[test]
fn test_known_only() {
    let mut config = OverlayConfig::default();
    config.loose_items.known_only = true;
    let (_, engine) = start(&config);
    assert_eq!(
        names(&engine.targets().loose_items),
        vec!["Bank Ledger", "Signal Beacon"]
    );
}

/// Containers list their matching contents; empty containers are skipped.
#[test]
fn test_container_contents() {
    let mut config = OverlayConfig::default();
    config.containers.enabled = true;
    let (_, engine) = start(&config);

    let containers = objects(&engine.targets().containers);
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].name, "Toolbox");
    assert_eq!(containers[0].detail.as_deref(), Some("Bolts, Wires"));
    assert_eq!(containers[0].color, Rgba::CYAN);

    config.containers.max_listed = 1;
    let (_, engine) = start(&config);
    assert_eq!(
        objects(&engine.targets().containers)[0].detail.as_deref(),
        Some("Bolts +1")
    );

    config.containers.filter = "wire".into();
    let (_, engine) = start(&config);
    assert_eq!(
        objects(&engine.targets().containers)[0].detail.as_deref(),
        Some("Wires")
    );

    config.containers.filter = "nothing".into();
    let (_, engine) = start(&config);
    assert!(engine.targets().containers.is_empty());
}

/// Only active and completable objectives mark quest targets.
#[test]
fn test_quest_targets() {
    let (_, engine) = start(&OverlayConfig::default());
    let mut labels: Vec<String> = engine.targets().quest.iter().map(|r| r.label()).collect();
    labels.sort();
    assert_eq!(
        labels,
        vec![
            "Quest: Bank Ledger (Courier)",
            "Quest: Signal Beacon (Signal)",
            "Zone: Drop Point (Signal)",
        ]
    );

    let mut config = OverlayConfig::default();
    config.quest.show_zones = false;
    let (_, engine) = start(&config);
    assert_eq!(engine.targets().quest.len(), 2);
}

/// A scan below its interval serves the previous list unchanged.
#[test]
fn test_refresh_throttle() {
    let config = OverlayConfig::default();
    let camera = PerspectiveCamera::default();
    let (mut sandbox, mut engine) = start(&config);

    let teammate = sandbox.find("Teammate").unwrap();
    sandbox.move_entity(teammate, Vec3::new(0.0, 0.0, 1000.0));

    engine.tick(&mut sandbox, &camera, &config, FrameTime::new(1, 0.05));
    assert!(names(&engine.targets().participants).contains(&"Teammate".to_string()));

    engine.tick(&mut sandbox, &camera, &config, FrameTime::new(2, 0.1));
    assert!(!names(&engine.targets().participants).contains(&"Teammate".to_string()));
}

/// Switching a category off drops its labels on the next tick.
#[test]
fn test_disabled_category_clears() {
    let mut config = OverlayConfig::default();
    let camera = PerspectiveCamera::default();
    let (mut sandbox, mut engine) = start(&config);
    assert!(!engine.targets().participants.is_empty());

    config.participants.enabled = false;
    config.quest.enabled = false;
    engine.tick(&mut sandbox, &camera, &config, FrameTime::new(1, 0.01));
    assert!(engine.targets().participants.is_empty());
    assert!(engine.targets().quest.is_empty());
    assert!(!engine.targets().loose_items.is_empty());
}

/// A participant that faults is skipped; the fault is logged once.
#[test]
fn test_faulty_entity_skipped() {
    let config = OverlayConfig::default();
    let camera = PerspectiveCamera::default();
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let scav = sandbox.find("Scav").unwrap();
    sandbox.break_entity(scav);

    let mut engine = OverlayEngine::new(&sandbox);
    for tick in 0..5u64 {
        engine.tick(&mut sandbox, &camera, &config, FrameTime::new(tick, tick as f64));
    }

    assert_eq!(
        names(&engine.targets().participants),
        vec!["Hidden", "Raider", "Teammate", "Warlord"]
    );
    assert!(engine.faults().has_seen(Feature::Participants, "position"));
    assert!(engine.faults().suppressed() > 0);
}
