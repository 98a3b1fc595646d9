//! Label layout.
//!
//! Each record becomes one main line at its screen anchor: the record label
//! and a rounded distance suffix. Records carrying a detail (container
//! contents) get a second line directly below.

use overlook_core::TargetLists;
use overlook_model::{Rgba, TargetRecord, Vec2};

use crate::canvas::Canvas;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Vertical distance between a label and its detail line, in pixels
    pub line_height: f32,
    pub show_distance: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            line_height: 14.0,
            show_distance: true,
        }
    }
}

/// A positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: Vec2,
    pub text: String,
    pub color: Rgba,
}

fn detail(record: &TargetRecord) -> Option<&str> {
    match record {
        TargetRecord::Object(r) => r.detail.as_deref(),
        _ => None,
    }
}

/// Lay out every record in `targets`. Anchors may sit slightly outside the
/// canvas (the engine keeps labels within a configured margin); clipping is
/// left to the canvas.
pub fn layout(targets: &TargetLists, style: &LabelStyle) -> Vec<Label> {
    let mut labels = Vec::with_capacity(targets.len());
    for record in targets.iter() {
        let at = record.screen();
        if !at.is_finite() {
            continue;
        }
        let text = if style.show_distance {
            format!("{} {:.0}m", record.label(), record.distance())
        } else {
            record.label()
        };
        labels.push(Label {
            at,
            text,
            color: record.color(),
        });
        if let Some(extra) = detail(record) {
            labels.push(Label {
                at: at + Vec2::new(0.0, style.line_height),
                text: extra.to_string(),
                color: record.color(),
            });
        }
    }
    labels
}

/// Draw `targets` onto `canvas`, returning the number of lines drawn.
pub fn render(canvas: &mut dyn Canvas, targets: &TargetLists, style: &LabelStyle) -> usize {
    let labels = layout(targets, style);
    for label in &labels {
        canvas.draw_text(label.at, &label.text, label.color);
    }
    labels.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlook_model::{ObjectCategory, ObjectRecord, ParticipantClass, ParticipantRecord};

    fn participant(x: f32, y: f32, distance: f32) -> TargetRecord {
        TargetRecord::Participant(ParticipantRecord {
            screen: Vec2::new(x, y),
            distance,
            name: "Scav".into(),
            class: ParticipantClass::Hostile,
            color: Rgba::RED,
        })
    }

    #[test]
    fn test_distance_suffix() {
        let targets = TargetLists {
            participants: vec![participant(100.0, 200.0, 41.6)],
            ..TargetLists::default()
        };
        let labels = layout(&targets, &LabelStyle::default());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Scav [HOSTILE] 42m");
        assert_eq!(labels[0].color, Rgba::RED);

        let plain = LabelStyle {
            show_distance: false,
            ..LabelStyle::default()
        };
        let labels = layout(&targets, &plain);
        assert_eq!(labels[0].text, "Scav [HOSTILE]");
    }

    #[test]
    fn test_detail_line_below() {
        let targets = TargetLists {
            containers: vec![TargetRecord::Object(ObjectRecord {
                screen: Vec2::new(300.0, 400.0),
                distance: 12.0,
                category: ObjectCategory::Container,
                name: "Crate".into(),
                detail: Some("Bolts, Wires".into()),
                color: Rgba::GREEN,
            })],
            ..TargetLists::default()
        };
        let labels = layout(&targets, &LabelStyle::default());
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "Crate 12m");
        assert_eq!(labels[1].text, "Bolts, Wires");
        assert_eq!(labels[1].at, Vec2::new(300.0, 414.0));
    }

    #[test]
    fn test_non_finite_anchor_skipped() {
        let targets = TargetLists {
            participants: vec![
                participant(-5.0, 10.0, 1.0),
                participant(10.0, 2000.0, 1.0),
                participant(f32::NAN, 10.0, 1.0),
                participant(10.0, 10.0, 1.0),
            ],
            ..TargetLists::default()
        };
        let labels = layout(&targets, &LabelStyle::default());
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|l| l.at.is_finite()));
    }
}
