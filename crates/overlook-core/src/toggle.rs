//! Forced Scalar Toggles
//!
//! One state machine shared by every feature that forces a single host
//! scalar. The host value is written only while the toggle is forced, and the
//! default is written back at most once per falling edge.

use crate::config::TuningConfig;
use crate::error::HostResult;
use crate::fault::{FaultLog, Feature};
use crate::host::{Tuning, TuningKey};

/// What a single `apply` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEdge {
    /// Disabled and never forced, nothing written
    Idle,
    /// Override written for the first time
    Engaged,
    /// Override re-written while forced
    Held,
    /// Default written back
    Released,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForcedToggle {
    forced: bool,
}

impl ForcedToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Drive the toggle for one tick.
    ///
    /// The override is re-written every tick while enabled so external
    /// resets do not stick. A failed write leaves the state unchanged, except
    /// on release where the toggle is dropped regardless.
    pub fn apply<T>(
        &mut self,
        desired: bool,
        override_value: T,
        default_value: impl FnOnce() -> T,
        mut write: impl FnMut(T) -> HostResult<()>,
    ) -> HostResult<ToggleEdge> {
        match (desired, self.forced) {
            (true, false) => {
                write(override_value)?;
                self.forced = true;
                Ok(ToggleEdge::Engaged)
            }
            (true, true) => {
                write(override_value)?;
                Ok(ToggleEdge::Held)
            }
            (false, true) => {
                self.forced = false;
                write(default_value())?;
                Ok(ToggleEdge::Released)
            }
            (false, false) => Ok(ToggleEdge::Idle),
        }
    }
}

/// Bounds a configured override value before it reaches the host.
fn sanitize(key: TuningKey, value: f32) -> f32 {
    if !value.is_finite() {
        return key.default_value();
    }
    match key {
        TuningKey::TimeScale => value.clamp(0.05, 10.0),
        TuningKey::LocomotionMode => value.round().clamp(0.0, 3.0),
        TuningKey::BoneScale => value.clamp(0.1, 5.0),
        TuningKey::FieldOfView => value.clamp(30.0, 150.0),
        TuningKey::SafetyThreshold | TuningKey::AmbientBoost => value.max(0.0),
    }
}

/// The six forced scalar features.
#[derive(Debug, Default)]
pub struct TuningOverrides {
    toggles: [ForcedToggle; 6],
}

impl TuningOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(key: TuningKey) -> usize {
        match key {
            TuningKey::SafetyThreshold => 0,
            TuningKey::TimeScale => 1,
            TuningKey::LocomotionMode => 2,
            TuningKey::BoneScale => 3,
            TuningKey::FieldOfView => 4,
            TuningKey::AmbientBoost => 5,
        }
    }

    pub fn is_forced(&self, key: TuningKey) -> bool {
        self.toggles[Self::index(key)].is_forced()
    }

    pub fn forced_count(&self) -> usize {
        self.toggles.iter().filter(|t| t.is_forced()).count()
    }

    /// Apply every toggle against the current configuration.
    pub fn pass<T: Tuning + ?Sized>(
        &mut self,
        host: &mut T,
        config: &TuningConfig,
        faults: &mut FaultLog,
    ) {
        for key in TuningKey::ALL {
            let setting = config.setting(key);
            self.apply_one(host, key, setting.enabled, sanitize(key, setting.value), faults);
        }
    }

    /// Write back every default this engine forced.
    pub fn release_all<T: Tuning + ?Sized>(&mut self, host: &mut T, faults: &mut FaultLog) {
        for key in TuningKey::ALL {
            self.apply_one(host, key, false, key.default_value(), faults);
        }
    }

    fn apply_one<T: Tuning + ?Sized>(
        &mut self,
        host: &mut T,
        key: TuningKey,
        desired: bool,
        value: f32,
        faults: &mut FaultLog,
    ) {
        let toggle = &mut self.toggles[Self::index(key)];
        match toggle.apply(desired, value, || key.default_value(), |v| host.write_tuning(key, v)) {
            Ok(ToggleEdge::Engaged) => tracing::debug!("Forcing {:?} to {}", key, value),
            Ok(ToggleEdge::Released) => tracing::debug!("Restored {:?}", key),
            Ok(_) => {}
            Err(err) => {
                faults.report(Feature::Tuning, key, &err);
            }
        }
    }
}
