//! Frame Timestamp
//!
//! The host drives the engine with one timestamp per tick: a monotonic tick
//! counter plus elapsed session seconds. Throttles schedule against seconds.
//!
//! # Example
//!
//! ```
//! use overlook_model::FrameTime;
//!
//! let t = FrameTime::new(3, 0.05);
//! assert_eq!(t.next(0.05).tick, 4);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp of one host tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameTime {
    /// Monotonic tick counter
    pub tick: u64,
    /// Seconds since session start
    pub seconds: f64,
}

impl FrameTime {
    pub fn new(tick: u64, seconds: f64) -> Self {
        Self { tick, seconds }
    }

    /// The timestamp one tick later, `dt` seconds on.
    pub fn next(self, dt: f64) -> Self {
        Self {
            tick: self.tick + 1,
            seconds: self.seconds + dt,
        }
    }
}

impl fmt::Display for FrameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} ({:.2}s)", self.tick, self.seconds)
    }
}
