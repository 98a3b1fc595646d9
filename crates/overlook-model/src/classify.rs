//! Entity Classification
//!
//! Faction, role, and entity-kind tags reported by the host, and the
//! participant class the overlay derives from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing an entity handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A participant (the viewer or anyone else moving around)
    Participant,
    /// An item lying loose in the world
    LooseItem,
    /// A static container holding items
    Container,
    /// A static trigger zone
    Zone,
    /// A lockable static object
    Door,
    /// Static geometry
    Obstacle,
}

/// Faction allegiance of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Blue,
    Red,
    /// Not aligned with either player faction
    Unaligned,
}

/// Role of a participant within its faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Standard,
    Elite,
    Escort,
    Specialist,
}

impl Role {
    /// Any role other than the rank-and-file one.
    pub fn is_non_standard(self) -> bool {
        !matches!(self, Role::Standard)
    }
}

/// Overlay classification of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantClass {
    Blue,
    Red,
    Hostile,
    Elite,
}

impl ParticipantClass {
    /// Resolve the class of a participant.
    ///
    /// Faction is resolved first. Only within the unaligned faction does a
    /// non-standard role override the generic hostile class; Blue and Red
    /// participants keep their faction class whatever their role.
    pub fn resolve(faction: Faction, role: Role) -> Self {
        match faction {
            Faction::Blue => ParticipantClass::Blue,
            Faction::Red => ParticipantClass::Red,
            Faction::Unaligned if role.is_non_standard() => ParticipantClass::Elite,
            Faction::Unaligned => ParticipantClass::Hostile,
        }
    }

    /// Short tag drawn next to the participant label.
    pub fn tag(self) -> &'static str {
        match self {
            ParticipantClass::Blue => "BLUE",
            ParticipantClass::Red => "RED",
            ParticipantClass::Hostile => "HOSTILE",
            ParticipantClass::Elite => "ELITE",
        }
    }
}

impl fmt::Display for ParticipantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
