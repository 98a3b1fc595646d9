//! Target Records
//!
//! One record per overlay label. Records are built fresh on every refresh of
//! their category and consumed by the renderer as an unordered list.

use serde::{Deserialize, Serialize};

use crate::{ParticipantClass, Rgba, Vec2};

/// A participant label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub screen: Vec2,
    pub distance: f32,
    pub name: String,
    pub class: ParticipantClass,
    pub color: Rgba,
}

/// Which object scanner produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    LooseItem,
    Container,
}

/// A loose item or container label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub screen: Vec2,
    pub distance: f32,
    pub category: ObjectCategory,
    pub name: String,
    /// Extra line, used for container contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub color: Rgba,
}

/// A quest item or quest zone label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub screen: Vec2,
    pub distance: f32,
    pub name: String,
    /// Name of the objective that made this target interesting
    pub objective: String,
    /// True for zones, false for items
    pub is_zone: bool,
    pub color: Rgba,
}

/// Any overlay label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TargetRecord {
    Participant(ParticipantRecord),
    Object(ObjectRecord),
    Quest(QuestRecord),
}

impl TargetRecord {
    pub fn screen(&self) -> Vec2 {
        match self {
            TargetRecord::Participant(r) => r.screen,
            TargetRecord::Object(r) => r.screen,
            TargetRecord::Quest(r) => r.screen,
        }
    }

    pub fn distance(&self) -> f32 {
        match self {
            TargetRecord::Participant(r) => r.distance,
            TargetRecord::Object(r) => r.distance,
            TargetRecord::Quest(r) => r.distance,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            TargetRecord::Participant(r) => r.color,
            TargetRecord::Object(r) => r.color,
            TargetRecord::Quest(r) => r.color,
        }
    }

    /// Main label text without the distance suffix.
    pub fn label(&self) -> String {
        match self {
            TargetRecord::Participant(r) => format!("{} [{}]", r.name, r.class.tag()),
            TargetRecord::Object(r) => r.name.clone(),
            TargetRecord::Quest(r) => {
                if r.is_zone {
                    format!("Zone: {} ({})", r.name, r.objective)
                } else {
                    format!("Quest: {} ({})", r.name, r.objective)
                }
            }
        }
    }
}
