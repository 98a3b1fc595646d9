//! Integration tests for forced tuning scalars.

use overlook_core::{OverlayConfig, OverlayEngine, PerspectiveCamera, Sandbox, TuningKey};
use overlook_model::{fixtures, FrameTime};

fn step(sandbox: &mut Sandbox, engine: &mut OverlayEngine<Sandbox>, config: &OverlayConfig, t: f64) {
    engine.tick(
        sandbox,
        &PerspectiveCamera::default(),
        config,
        FrameTime::new(0, t),
    );
}

/// Nothing is written for features that were never enabled.
#[test]
fn test_never_enabled_writes_nothing() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    for i in 0..10 {
        step(&mut sandbox, &mut engine, &OverlayConfig::default(), i as f64);
    }
    engine.release_all(&mut sandbox);
    assert!(sandbox.tuning_writes().is_empty());
}

/// The override is re-written while enabled and the default restored once.
#[test]
fn test_force_hold_and_restore() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let mut config = OverlayConfig::default();
    config.tuning.time_scale.enabled = true;

    step(&mut sandbox, &mut engine, &config, 0.0);
    assert_eq!(sandbox.tuning_value(TuningKey::TimeScale), 1.5);
    assert!(engine.tuning().is_forced(TuningKey::TimeScale));

    // The host resets the value; the next tick writes it again
    sandbox.reset_tuning_external(TuningKey::TimeScale);
    step(&mut sandbox, &mut engine, &config, 0.1);
    assert_eq!(sandbox.tuning_value(TuningKey::TimeScale), 1.5);

    config.tuning.time_scale.enabled = false;
    step(&mut sandbox, &mut engine, &config, 0.2);
    step(&mut sandbox, &mut engine, &config, 0.3);
    assert_eq!(sandbox.tuning_value(TuningKey::TimeScale), 1.0);
    assert_eq!(
        sandbox.tuning_writes(),
        &[
            (TuningKey::TimeScale, 1.5),
            (TuningKey::TimeScale, 1.5),
            (TuningKey::TimeScale, 1.0),
        ]
    );
}

/// Each key is forced independently, and release writes back every default.
#[test]
fn test_independent_keys_and_release() {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let mut config = OverlayConfig::default();
    config.tuning.bone_scale.enabled = true;
    config.tuning.field_of_view.enabled = true;
    config.tuning.field_of_view.value = 500.0;

    step(&mut sandbox, &mut engine, &config, 0.0);
    assert_eq!(sandbox.tuning_value(TuningKey::BoneScale), 2.0);
    // Clamped before it reaches the host
    assert_eq!(sandbox.tuning_value(TuningKey::FieldOfView), 150.0);
    assert_eq!(sandbox.tuning_value(TuningKey::SafetyThreshold), 3.0);
    assert_eq!(engine.stats().forced, 2);

    engine.release_all(&mut sandbox);
    for key in TuningKey::ALL {
        assert_eq!(sandbox.tuning_value(key), key.default_value(), "{:?}", key);
    }
    assert_eq!(engine.stats().forced, 0);
}
