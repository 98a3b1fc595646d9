//! World Fixture Types
//!
//! Serializable description of a world used to seed the in-memory host.
//! Fixtures are plain JSON so scenarios can be written by hand.

use serde::{Deserialize, Serialize};

use crate::{Faction, Objective, Role, Vec3};

/// Generates a stable identifier from 16 random bytes.
///
/// The caller supplies the bytes so that seeded runs stay reproducible.
pub fn generate_item_id(random: [u8; 16]) -> String {
    uuid::Builder::from_random_bytes(random)
        .into_uuid()
        .simple()
        .to_string()
}

fn yes() -> bool {
    true
}

fn one() -> u8 {
    1
}

fn static_layer() -> String {
    "static".to_string()
}

/// A participant (including the viewer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantFixture {
    pub name: String,
    /// Stable identity; generated when absent
    #[serde(default)]
    pub profile_id: Option<String>,
    pub position: Vec3,
    /// Head bone position, when the body has one
    #[serde(default)]
    pub head: Option<Vec3>,
    pub faction: Faction,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "yes")]
    pub alive: bool,
    #[serde(default = "yes")]
    pub active: bool,
    /// Number of renderer surfaces on the body
    #[serde(default = "one")]
    pub surfaces: u8,
}

impl ParticipantFixture {
    pub fn new(name: impl Into<String>, position: Vec3, faction: Faction) -> Self {
        Self {
            name: name.into(),
            profile_id: None,
            position,
            head: None,
            faction,
            role: Role::Standard,
            alive: true,
            active: true,
            surfaces: 1,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_head(mut self, head: Vec3) -> Self {
        self.head = Some(head);
        self
    }

    pub fn dead(mut self) -> Self {
        self.alive = false;
        self
    }
}

/// A loose item, or an entry inside a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFixture {
    /// Template identifier shared by all items of this kind
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Whether the viewer has examined this kind of item
    #[serde(default)]
    pub examined: bool,
}

impl ItemFixture {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            position,
            examined: false,
        }
    }

    pub fn examined(mut self) -> Self {
        self.examined = true;
        self
    }
}

/// A static container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerFixture {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub contents: Vec<ItemFixture>,
}

/// A static trigger zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneFixture {
    pub zone_id: String,
    pub name: String,
    pub position: Vec3,
}

/// A lockable static object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorFixture {
    pub name: String,
    pub lock_class: String,
    pub position: Vec3,
    #[serde(default = "yes")]
    pub locked: bool,
}

/// Static geometry blocking line of sight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderFixture {
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default = "static_layer")]
    pub layer: String,
}

/// Complete world description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldFixture {
    #[serde(default)]
    pub viewer: Option<ParticipantFixture>,
    #[serde(default)]
    pub participants: Vec<ParticipantFixture>,
    #[serde(default)]
    pub items: Vec<ItemFixture>,
    #[serde(default)]
    pub containers: Vec<ContainerFixture>,
    #[serde(default)]
    pub zones: Vec<ZoneFixture>,
    #[serde(default)]
    pub doors: Vec<DoorFixture>,
    #[serde(default)]
    pub colliders: Vec<ColliderFixture>,
    /// The viewer's objective list
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl WorldFixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total number of entities the fixture spawns, viewer included.
    pub fn entity_count(&self) -> usize {
        usize::from(self.viewer.is_some())
            + self.participants.len()
            + self.items.len()
            + self.containers.len()
            + self.zones.len()
            + self.doors.len()
            + self.colliders.len()
    }
}
