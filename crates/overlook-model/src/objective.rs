//! Objective Types
//!
//! The viewer's objective list as reported by the host. Conditions are a
//! closed set of known kinds; anything the host reports that does not match
//! one of them deserializes as [`ObjectiveCondition::Unknown`] and is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Progress state of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    Locked,
    Active,
    /// All conditions met, waiting to be handed in
    Completable,
    Completed,
    Failed,
}

impl ObjectiveStatus {
    /// Only active and completable objectives point at things in the world.
    pub fn contributes(self) -> bool {
        matches!(self, ObjectiveStatus::Active | ObjectiveStatus::Completable)
    }
}

/// One condition of an objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveCondition {
    /// Find any of the listed item templates in the world
    FindItem { item_ids: Vec<String> },
    /// Hand over items of the listed templates
    HandoverItem { item_ids: Vec<String> },
    /// Visit a zone
    VisitZone { zone_id: String },
    /// Place an item inside a zone
    PlaceItem { zone_id: String, item_ids: Vec<String> },
    /// A condition kind this build does not know about
    #[serde(other)]
    Unknown,
}

impl ObjectiveCondition {
    /// Item template identifiers this condition points at.
    pub fn item_ids(&self) -> &[String] {
        match self {
            ObjectiveCondition::FindItem { item_ids }
            | ObjectiveCondition::HandoverItem { item_ids }
            | ObjectiveCondition::PlaceItem { item_ids, .. } => item_ids.as_slice(),
            ObjectiveCondition::VisitZone { .. } | ObjectiveCondition::Unknown => &[],
        }
    }

    /// Zone identifier this condition points at, if any.
    pub fn zone_id(&self) -> Option<&str> {
        match self {
            ObjectiveCondition::VisitZone { zone_id }
            | ObjectiveCondition::PlaceItem { zone_id, .. } => Some(zone_id.as_str()),
            _ => None,
        }
    }
}

/// An objective in the viewer's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub objective_id: String,
    pub name: String,
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub conditions: Vec<ObjectiveCondition>,
}

impl Objective {
    pub fn new(
        objective_id: impl Into<String>,
        name: impl Into<String>,
        status: ObjectiveStatus,
    ) -> Self {
        Self {
            objective_id: objective_id.into(),
            name: name.into(),
            status,
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: ObjectiveCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Collect the item ids referenced by contributing objectives.
///
/// Maps each id to the name of the first objective that references it.
pub fn interesting_items(objectives: &[Objective]) -> Vec<(String, String)> {
    collect(objectives, |c| c.item_ids().to_vec())
}

/// Collect the zone ids referenced by contributing objectives.
pub fn interesting_zones(objectives: &[Objective]) -> Vec<(String, String)> {
    collect(objectives, |c| c.zone_id().map(str::to_string).into_iter().collect())
}

fn collect(
    objectives: &[Objective],
    ids_of: impl Fn(&ObjectiveCondition) -> Vec<String>,
) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for objective in objectives.iter().filter(|o| o.status.contributes()) {
        for condition in &objective.conditions {
            for id in ids_of(condition) {
                if seen.insert(id.clone()) {
                    out.push((id, objective.name.clone()));
                }
            }
        }
    }
    out
}
