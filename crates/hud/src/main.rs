//! Overlook headless driver
//!
//! Runs the overlay engine against the in-memory sandbox host, with entities
//! appearing and disappearing between ticks, then prints the rendered label
//! list and engine statistics. On exit every override is released and the
//! host is checked for leftovers.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use hud::{random_world, render, LabelStyle, ScenarioOptions, TextCanvas};
use overlook_core::{
    default_config_toml, Camera, OverlayConfig, OverlayEngine, PerspectiveCamera, Sandbox,
    TuningKey,
};
use overlook_model::{FrameTime, WorldFixture};

/// Command line arguments for the headless driver
#[derive(Parser, Debug)]
#[command(name = "overlook")]
#[command(about = "Drive the overlay engine against a simulated world")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Random seed for world generation and churn
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML configuration file (defaults are used when absent)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON world fixture (a random world is generated when absent)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Number of entities in a generated world
    #[arg(long, default_value_t = 60)]
    entities: usize,

    /// Ticks between churn steps, 0 to disable churn
    #[arg(long, default_value_t = 10)]
    churn_every: u64,

    /// Print the default configuration and exit
    #[arg(long)]
    dump_config: bool,

    /// Print target lists and stats as JSON instead of labels
    #[arg(long)]
    json: bool,
}

const DT: f64 = 1.0 / 30.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<OverlayConfig, String> {
    match &args.config {
        Some(path) => {
            let config = OverlayConfig::from_file(path)
                .map_err(|e| format!("Could not load {}: {}", path.display(), e))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(OverlayConfig::default()),
    }
}

fn load_world(args: &Args, rng: &mut SmallRng) -> Result<WorldFixture, String> {
    match &args.fixture {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
            let world = WorldFixture::from_json(&json)
                .map_err(|e| format!("Could not parse {}: {}", path.display(), e))?;
            info!("Loaded fixture from {}", path.display());
            Ok(world)
        }
        None => Ok(random_world(
            rng,
            &ScenarioOptions {
                entities: args.entities,
                ..ScenarioOptions::default()
            },
        )),
    }
}

/// Anything the engine still holds on the host after a full release.
fn leftovers(sandbox: &Sandbox, engine: &OverlayEngine<Sandbox>) -> Vec<String> {
    let mut found = Vec::new();
    if sandbox.overridden_count() > 0 {
        found.push(format!("{} surfaces still overridden", sandbox.overridden_count()));
    }
    if sandbox.unculled_count() > 0 {
        found.push(format!(
            "{} surfaces with occlusion culling off",
            sandbox.unculled_count()
        ));
    }
    if sandbox.outline_count() > 0 {
        found.push(format!("{} outline shells alive", sandbox.outline_count()));
    }
    if !engine.culling().is_empty() {
        found.push(format!("{} entities still culled", engine.culling().len()));
    }
    for key in TuningKey::ALL {
        if sandbox.tuning_value(key) != key.default_value() {
            found.push(format!("{:?} not at default", key));
        }
    }
    found
}

fn run(args: &Args) -> Result<bool, String> {
    let config = load_config(args)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let world = load_world(args, &mut rng)?;

    let mut sandbox = Sandbox::from_fixture(&world);
    let mut engine = OverlayEngine::new(&sandbox);
    let camera = PerspectiveCamera::default();
    info!(
        "Spawned {} entities, line of sight fallback: {}",
        world.entity_count(),
        engine.line_of_sight().is_fallback()
    );

    let mut now = FrameTime::new(0, 0.0);
    let mut churned = 0;
    for tick in 0..args.ticks {
        if args.churn_every > 0 && tick > 0 && tick % args.churn_every == 0 {
            churned += sandbox.churn(&mut rng).despawned;
        }
        engine.tick(&mut sandbox, &camera, &config, now);
        now = now.next(DT);
    }

    let stats = engine.stats();
    if args.json {
        let output = serde_json::json!({
            "targets": engine.targets(),
            "stats": stats,
        });
        let text = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        println!("{}", text);
    } else {
        let mut canvas = TextCanvas::new(camera.screen_size());
        let drawn = render(&mut canvas, engine.targets(), &LabelStyle::default());
        println!("Overlook");
        println!("========");
        println!("Ticks: {}  Seed: {}  Churned: {}", args.ticks, args.seed, churned);
        println!();
        print!("{}", canvas.to_text());
        println!();
        println!("Labels drawn: {}", drawn);
        println!(
            "Targets: {} participants, {} loose items, {} containers, {} quest",
            stats.participants, stats.loose_items, stats.containers, stats.quest
        );
        println!(
            "Overrides: {} participant surfaces, {} loot surfaces, {} outlines",
            stats.chams_owned, stats.loot_chams_owned, stats.outlines
        );
        println!("Culled: {}  Forced scalars: {}", stats.culled, stats.forced);
        println!(
            "Faults: {} ({} suppressed)",
            stats.faults, stats.faults_suppressed
        );
    }

    engine.release_all(&mut sandbox);
    let found = leftovers(&sandbox, &engine);
    for leftover in &found {
        warn!("Not restored after release: {}", leftover);
    }
    if found.is_empty() {
        info!("Released all overrides, host restored");
    }
    Ok(found.is_empty())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if args.dump_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
