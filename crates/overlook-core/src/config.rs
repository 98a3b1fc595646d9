//! Configuration loading for the overlay engine.
//!
//! All settings are loaded from a TOML configuration file. The engine takes
//! the configuration by reference on every tick and never caches a value
//! across ticks; numeric settings are clamped where they are used.

use serde::{Deserialize, Serialize};
use std::path::Path;

use overlook_model::{ParticipantClass, Rgba};

use crate::error::{ConfigError, TomlSerializeError};
use crate::host::TuningKey;

/// Lower bound for override intensity and opacity.
pub const MIN_STRENGTH: f32 = 0.1;
/// Upper bound for override intensity and opacity.
pub const MAX_STRENGTH: f32 = 1.0;

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub participants: ParticipantScanConfig,
    #[serde(default)]
    pub loose_items: ItemScanConfig,
    #[serde(default)]
    pub containers: ContainerScanConfig,
    #[serde(default)]
    pub quest: QuestScanConfig,
    /// Visual override on participants
    #[serde(default)]
    pub chams: ChamsConfig,
    /// Visual override on loose items
    #[serde(default = "ChamsConfig::loot_default")]
    pub loot_chams: ChamsConfig,
    #[serde(default)]
    pub culling: CullingConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            participants: ParticipantScanConfig::default(),
            loose_items: ItemScanConfig::default(),
            containers: ContainerScanConfig::default(),
            quest: QuestScanConfig::default(),
            chams: ChamsConfig::default(),
            loot_chams: ChamsConfig::loot_default(),
            culling: CullingConfig::default(),
            tuning: TuningConfig::default(),
            screen: ScreenConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Non-negative distance, treating NaN as zero.
fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Non-negative interval in seconds, treating NaN as zero.
fn non_negative_secs(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Clamp an intensity or opacity into the supported range.
pub fn clamp_strength(value: f32) -> f32 {
    if value.is_nan() {
        MIN_STRENGTH
    } else {
        value.clamp(MIN_STRENGTH, MAX_STRENGTH)
    }
}

/// Participant scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantScanConfig {
    pub enabled: bool,
    pub max_distance: f32,
    /// Only show participants with a clear line of sight
    pub visible_only: bool,
    /// Seconds between scans
    pub refresh_interval: f64,
}

impl Default for ParticipantScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: 300.0,
            visible_only: false,
            refresh_interval: 0.1,
        }
    }
}

impl ParticipantScanConfig {
    pub fn max_distance(&self) -> f32 {
        non_negative(self.max_distance)
    }

    pub fn refresh_interval(&self) -> f64 {
        non_negative_secs(self.refresh_interval)
    }
}

/// Loose item scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemScanConfig {
    pub enabled: bool,
    pub max_distance: f32,
    /// Comma-separated name filter, empty matches everything
    pub filter: String,
    /// Only show items the viewer has examined
    pub known_only: bool,
    pub refresh_interval: f64,
}

impl Default for ItemScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: 100.0,
            filter: String::new(),
            known_only: false,
            refresh_interval: 0.5,
        }
    }
}

impl ItemScanConfig {
    pub fn max_distance(&self) -> f32 {
        non_negative(self.max_distance)
    }

    pub fn refresh_interval(&self) -> f64 {
        non_negative_secs(self.refresh_interval)
    }
}

/// Container content scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerScanConfig {
    pub enabled: bool,
    pub max_distance: f32,
    pub filter: String,
    pub refresh_interval: f64,
    /// Seconds between rebuilds of the cached container list
    pub cache_interval: f64,
    /// Content names listed before collapsing into "+N"
    pub max_listed: usize,
}

impl Default for ContainerScanConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_distance: 50.0,
            filter: String::new(),
            refresh_interval: 1.0,
            cache_interval: 10.0,
            max_listed: 3,
        }
    }
}

impl ContainerScanConfig {
    pub fn max_distance(&self) -> f32 {
        non_negative(self.max_distance)
    }

    pub fn refresh_interval(&self) -> f64 {
        non_negative_secs(self.refresh_interval)
    }

    pub fn cache_interval(&self) -> f64 {
        non_negative_secs(self.cache_interval)
    }
}

/// Quest item and zone scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestScanConfig {
    pub enabled: bool,
    pub max_distance: f32,
    pub show_items: bool,
    pub show_zones: bool,
    pub refresh_interval: f64,
}

impl Default for QuestScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: 500.0,
            show_items: true,
            show_zones: true,
            refresh_interval: 1.0,
        }
    }
}

impl QuestScanConfig {
    pub fn max_distance(&self) -> f32 {
        non_negative(self.max_distance)
    }

    pub fn refresh_interval(&self) -> f64 {
        non_negative_secs(self.refresh_interval)
    }
}

/// How overridden surfaces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChamsMode {
    /// Flat color through walls
    #[default]
    Flat,
    /// Flat color plus a scaled back-face outline
    Outline,
}

/// Visual override settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamsConfig {
    pub enabled: bool,
    pub max_distance: f32,
    /// RGB multiplier, clamped to [0.1, 1.0]
    pub intensity: f32,
    /// Alpha, clamped to [0.1, 1.0]
    pub opacity: f32,
    pub mode: ChamsMode,
    pub outline_scale: f32,
    pub outline_scale_min: f32,
    pub outline_scale_max: f32,
    /// Seconds between destroyed-entry sweeps
    pub sweep_interval: f64,
}

impl Default for ChamsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_distance: 300.0,
            intensity: 1.0,
            opacity: 1.0,
            mode: ChamsMode::Flat,
            outline_scale: 1.04,
            outline_scale_min: 1.01,
            outline_scale_max: 1.10,
            sweep_interval: 5.0,
        }
    }
}

impl ChamsConfig {
    /// Defaults for the loose item override.
    pub fn loot_default() -> Self {
        Self {
            max_distance: 50.0,
            ..Self::default()
        }
    }

    pub fn max_distance(&self) -> f32 {
        non_negative(self.max_distance)
    }

    pub fn intensity(&self) -> f32 {
        clamp_strength(self.intensity)
    }

    pub fn opacity(&self) -> f32 {
        clamp_strength(self.opacity)
    }

    /// Outline scale clamped into the configured range.
    pub fn outline_scale(&self) -> f32 {
        let lo = self.outline_scale_min.min(self.outline_scale_max).max(1.0);
        let hi = self.outline_scale_max.max(lo);
        if self.outline_scale.is_nan() {
            lo
        } else {
            self.outline_scale.clamp(lo, hi)
        }
    }

    pub fn sweep_interval(&self) -> f64 {
        non_negative_secs(self.sweep_interval)
    }

    /// Final override color for a base color: RGB scaled by intensity,
    /// alpha replaced by opacity.
    pub fn shade(&self, base: Rgba) -> Rgba {
        base.scaled(self.intensity()).with_alpha(self.opacity())
    }
}

/// Distance culling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    pub enabled: bool,
    pub render_distance: f32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            render_distance: 500.0,
        }
    }
}

/// One forced scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningSetting {
    pub enabled: bool,
    pub value: f32,
}

impl TuningSetting {
    pub const fn off(value: f32) -> Self {
        Self {
            enabled: false,
            value,
        }
    }
}

/// Forced scalar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub safety_threshold: TuningSetting,
    pub time_scale: TuningSetting,
    pub locomotion_mode: TuningSetting,
    pub bone_scale: TuningSetting,
    pub field_of_view: TuningSetting,
    pub ambient_boost: TuningSetting,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            safety_threshold: TuningSetting::off(1000.0),
            time_scale: TuningSetting::off(1.5),
            locomotion_mode: TuningSetting::off(1.0),
            bone_scale: TuningSetting::off(2.0),
            field_of_view: TuningSetting::off(90.0),
            ambient_boost: TuningSetting::off(1.0),
        }
    }
}

impl TuningConfig {
    pub fn setting(&self, key: TuningKey) -> TuningSetting {
        match key {
            TuningKey::SafetyThreshold => self.safety_threshold,
            TuningKey::TimeScale => self.time_scale,
            TuningKey::LocomotionMode => self.locomotion_mode,
            TuningKey::BoneScale => self.bone_scale,
            TuningKey::FieldOfView => self.field_of_view,
            TuningKey::AmbientBoost => self.ambient_boost,
        }
    }

    pub fn setting_mut(&mut self, key: TuningKey) -> &mut TuningSetting {
        match key {
            TuningKey::SafetyThreshold => &mut self.safety_threshold,
            TuningKey::TimeScale => &mut self.time_scale,
            TuningKey::LocomotionMode => &mut self.locomotion_mode,
            TuningKey::BoneScale => &mut self.bone_scale,
            TuningKey::FieldOfView => &mut self.field_of_view,
            TuningKey::AmbientBoost => &mut self.ambient_boost,
        }
    }
}

/// Screen-space settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Pixels a label may sit outside the visible rectangle
    pub margin: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { margin: 50.0 }
    }
}

impl ScreenConfig {
    pub fn margin(&self) -> f32 {
        non_negative(self.margin)
    }
}

/// Label and override colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub blue: Rgba,
    pub red: Rgba,
    pub hostile: Rgba,
    pub elite: Rgba,
    pub loose_item: Rgba,
    pub container: Rgba,
    pub quest_item: Rgba,
    pub quest_zone: Rgba,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            blue: Rgba::BLUE,
            red: Rgba::RED,
            hostile: Rgba::ORANGE,
            elite: Rgba::MAGENTA,
            loose_item: Rgba::GREEN,
            container: Rgba::CYAN,
            quest_item: Rgba::YELLOW,
            quest_zone: Rgba::YELLOW,
        }
    }
}

impl ColorConfig {
    pub fn for_class(&self, class: ParticipantClass) -> Rgba {
        match class {
            ParticipantClass::Blue => self.blue,
            ParticipantClass::Red => self.red,
            ParticipantClass::Hostile => self.hostile,
            ParticipantClass::Elite => self.elite,
        }
    }
}

/// Returns a default configuration file with comments.
pub fn default_config_toml() -> String {
    r#"# Overlay Configuration

[participants]
enabled = true
max_distance = 300.0
visible_only = false
refresh_interval = 0.1

[loose_items]
enabled = true
max_distance = 100.0
filter = ""
known_only = false
refresh_interval = 0.5

[containers]
enabled = false
max_distance = 50.0
filter = ""
refresh_interval = 1.0
cache_interval = 10.0
max_listed = 3

[quest]
enabled = true
max_distance = 500.0
show_items = true
show_zones = true
refresh_interval = 1.0

[chams]
enabled = false
max_distance = 300.0
intensity = 1.0
opacity = 1.0
mode = "flat"
outline_scale = 1.04
outline_scale_min = 1.01
outline_scale_max = 1.10
sweep_interval = 5.0

[loot_chams]
enabled = false
max_distance = 50.0

[culling]
enabled = false
render_distance = 500.0

[tuning]
safety_threshold = { enabled = false, value = 1000.0 }
time_scale = { enabled = false, value = 1.5 }
locomotion_mode = { enabled = false, value = 1.0 }
bone_scale = { enabled = false, value = 2.0 }
field_of_view = { enabled = false, value = 90.0 }
ambient_boost = { enabled = false, value = 1.0 }

[screen]
margin = 50.0
"#
    .to_string()
}
