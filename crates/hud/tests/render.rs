//! Rendering the engine's target lists onto a text canvas.

use overlook_core::{Camera, OverlayConfig, OverlayEngine, PerspectiveCamera, Sandbox};
use overlook_model::{fixtures, FrameTime};

use hud::{render, LabelStyle, TextCanvas};

fn rendered(config: &OverlayConfig) -> (TextCanvas, usize, usize) {
    let mut sandbox = Sandbox::from_fixture(&fixtures::sample_world());
    let mut engine = OverlayEngine::new(&sandbox);
    let camera = PerspectiveCamera::default();
    engine.tick(&mut sandbox, &camera, config, FrameTime::new(0, 0.0));

    let mut canvas = TextCanvas::new(camera.screen_size());
    let drawn = render(&mut canvas, engine.targets(), &LabelStyle::default());
    (canvas, drawn, engine.targets().len())
}

/// Every record is drawn with its distance suffix.
#[test]
fn test_sample_world_labels() {
    let (canvas, drawn, records) = rendered(&OverlayConfig::default());
    assert_eq!(drawn, records);
    assert_eq!(canvas.len(), drawn);

    let texts: Vec<String> = canvas.lines().iter().map(|l| l.text.clone()).collect();
    assert!(texts.contains(&"Warlord [ELITE] 90m".to_string()), "{:?}", texts);
    assert!(texts.iter().any(|t| t.starts_with("Quest: Bank Ledger (Courier) ")));
    assert!(texts.iter().any(|t| t.starts_with("Zone: Drop Point (Signal) ")));
}

/// Containers get their contents on a second line.
#[test]
fn test_container_detail_line() {
    let mut config = OverlayConfig::default();
    config.containers.enabled = true;
    let (canvas, drawn, records) = rendered(&config);
    // One extra line for the single non-empty container
    assert_eq!(drawn, records + 1);

    let lines = canvas.lines();
    let header = lines
        .iter()
        .find(|l| l.text.starts_with("Toolbox "))
        .unwrap();
    let detail = lines.iter().find(|l| l.text == "Bolts, Wires").unwrap();
    assert_eq!(detail.at.x, header.at.x);
    assert_eq!(detail.at.y, header.at.y + LabelStyle::default().line_height);
    assert_eq!(detail.color, header.color);
}

/// Nothing is drawn when every scanner is off.
#[test]
fn test_disabled_scanners_draw_nothing() {
    let mut config = OverlayConfig::default();
    config.participants.enabled = false;
    config.loose_items.enabled = false;
    config.quest.enabled = false;
    let (canvas, drawn, _) = rendered(&config);
    assert_eq!(drawn, 0);
    assert!(canvas.to_text().is_empty());
}
