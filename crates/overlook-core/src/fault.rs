//! Fault Log
//!
//! Per-entity faults never abort a pass. The first fault of each kind per
//! feature is logged with full detail; identical faults after that are only
//! counted.

use std::collections::HashSet;
use std::fmt;

use crate::error::HostError;

/// Engine feature a fault is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Participants,
    LooseItems,
    Containers,
    Quest,
    LineOfSight,
    Chams,
    LootChams,
    Culling,
    Tuning,
    Actions,
}

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::Participants => "participants",
            Feature::LooseItems => "loose_items",
            Feature::Containers => "containers",
            Feature::Quest => "quest",
            Feature::LineOfSight => "line_of_sight",
            Feature::Chams => "chams",
            Feature::LootChams => "loot_chams",
            Feature::Culling => "culling",
            Feature::Tuning => "tuning",
            Feature::Actions => "actions",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Session-wide record of which faults have already been logged.
#[derive(Debug, Default)]
pub struct FaultLog {
    seen: HashSet<(Feature, &'static str)>,
    total: u64,
}

impl FaultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a host fault on `subject`. Returns true when it was logged.
    pub fn report(&mut self, feature: Feature, subject: impl fmt::Debug, error: &HostError) -> bool {
        self.note(feature, error.kind(), format_args!("{:?}: {}", subject, error))
    }

    /// Record a fault that did not come from a host call.
    pub fn note(&mut self, feature: Feature, kind: &'static str, detail: impl fmt::Display) -> bool {
        self.total += 1;
        if self.seen.insert((feature, kind)) {
            tracing::warn!("{} fault ({}): {}", feature, kind, detail);
            true
        } else {
            false
        }
    }

    /// Whether a fault of this kind has been seen for the feature.
    pub fn has_seen(&self, feature: Feature, kind: &str) -> bool {
        self.seen.iter().any(|(f, k)| *f == feature && *k == kind)
    }

    /// Number of faults reported, logged or not.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of faults that were counted but not logged.
    pub fn suppressed(&self) -> u64 {
        self.total - self.seen.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fault_logged_once() {
        let mut log = FaultLog::new();
        let err = HostError::MissingComponent("head");

        assert!(log.report(Feature::Participants, 1u32, &err));
        assert!(!log.report(Feature::Participants, 2u32, &err));
        assert!(!log.report(Feature::Participants, 3u32, &err));

        assert_eq!(log.total(), 3);
        assert_eq!(log.suppressed(), 2);
        assert!(log.has_seen(Feature::Participants, "head"));
    }

    #[test]
    fn test_same_fault_on_other_feature_logged() {
        let mut log = FaultLog::new();
        let err = HostError::StaleHandle;
        assert!(log.report(Feature::Chams, "s1", &err));
        assert!(log.report(Feature::LootChams, "s1", &err));
        assert!(!log.report(Feature::Chams, "s2", &err));
    }

    #[test]
    fn test_different_kinds_logged_separately() {
        let mut log = FaultLog::new();
        assert!(log.report(Feature::Culling, 0, &HostError::StaleHandle));
        assert!(log.report(Feature::Culling, 0, &HostError::MissingComponent("active")));
        assert!(log.note(Feature::Culling, "custom", "detail"));
        assert_eq!(log.suppressed(), 0);
    }
}
