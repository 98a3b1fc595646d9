//! Long-running tests with entities appearing and disappearing between ticks.

use std::path::Path;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use overlook_core::{
    EngineStats, OverlayConfig, OverlayEngine, PerspectiveCamera, Sandbox, Surfaces, TuningKey,
};
use overlook_model::{fixtures, FrameTime};

const TICKS: u64 = 600;
const DT: f64 = 1.0 / 30.0;

fn stress_config() -> OverlayConfig {
    OverlayConfig::from_file(Path::new("tests/fixtures/stress.toml")).expect("Failed to load stress.toml")
}

/// Every owned surface that still exists carries an override.
fn assert_ownership_consistent(sandbox: &Sandbox, engine: &OverlayEngine<Sandbox>) {
    for map in [engine.chams().owned(), engine.loot_chams().owned()] {
        for surface in map.keys() {
            if !sandbox.surface_valid(surface) {
                continue;
            }
            let state = sandbox.surface_state(surface).unwrap();
            assert_ne!(state.material, state.base, "owned surface {:?} not overridden", surface);
            assert_eq!(map.get(surface).unwrap().original, state.base);
        }
    }
    assert_eq!(
        sandbox.overridden_count(),
        engine
            .chams()
            .owned()
            .keys()
            .into_iter()
            .chain(engine.loot_chams().owned().keys())
            .filter(|s| sandbox.surface_valid(*s))
            .count()
    );
}

fn run(seed: u64) -> (Sandbox, OverlayEngine<Sandbox>, EngineStats) {
    let config = stress_config();
    let camera = PerspectiveCamera::default();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);

    let mut now = FrameTime::new(0, 0.0);
    for tick in 0..TICKS {
        if tick % 10 == 0 {
            sandbox.churn(&mut rng);
        }
        engine.tick(&mut sandbox, &camera, &config, now);
        assert_ownership_consistent(&sandbox, &engine);
        now = now.next(DT);
    }
    let stats = engine.stats();
    (sandbox, engine, stats)
}

/// The stress configuration loads from disk.
#[test]
fn test_stress_config_loads() {
    let config = stress_config();
    assert!(config.chams.enabled);
    assert_eq!(config.loot_chams.max_distance, 80.0);
    assert_eq!(config.culling.render_distance, 150.0);
    assert!(config.tuning.time_scale.enabled);
    assert!(!config.tuning.locomotion_mode.enabled);
}

/// Ownership stays consistent under churn and release restores the host.
#[test]
fn test_churn_then_release() {
    let (mut sandbox, mut engine, stats) = run(42);
    assert_eq!(stats.ticks, TICKS);
    assert!(stats.chams_owned > 0);
    assert_eq!(stats.forced, 2);
    assert_eq!(sandbox.tuning_value(TuningKey::TimeScale), 1.25);

    engine.release_all(&mut sandbox);

    assert_eq!(sandbox.overridden_count(), 0);
    assert_eq!(sandbox.unculled_count(), 0);
    assert_eq!(sandbox.outline_count(), 0);
    assert_eq!(sandbox.inactive_count(), 0);
    for key in TuningKey::ALL {
        assert_eq!(sandbox.tuning_value(key), key.default_value());
    }
    assert!(engine.targets().is_empty());
}

/// Two runs with the same seed end in the same state.
#[test]
fn test_churn_is_deterministic() {
    let (_, _, a) = run(7);
    let (_, _, b) = run(7);
    assert_eq!(a, b);
}
