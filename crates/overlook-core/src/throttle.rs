//! Interval Throttles
//!
//! The only scheduling primitive in the engine: each throttle remembers the
//! next time it may fire. The interval is supplied on every check so that a
//! configuration change takes effect on the next firing.

/// Fires at most once per interval.
#[derive(Debug, Clone, Default)]
pub struct Throttle {
    next_at: Option<f64>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `now` has reached the next slot, and schedules the
    /// slot after it. The first check always fires.
    pub fn ready(&mut self, now: f64, interval: f64) -> bool {
        match self.next_at {
            Some(next) if now < next => false,
            _ => {
                self.next_at = Some(now + interval);
                true
            }
        }
    }

    /// Forget the schedule so the next check fires immediately.
    pub fn reset(&mut self) {
        self.next_at = None;
    }

    /// Time of the next slot, if one is scheduled.
    pub fn next_at(&self) -> Option<f64> {
        self.next_at
    }
}

/// A list rebuilt no more often than its interval allows.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    throttle: Throttle,
    items: Vec<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            throttle: Throttle::new(),
            items: Vec::new(),
        }
    }
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild with `build` when the interval has elapsed, otherwise keep the
    /// previous list. Returns true when a rebuild happened.
    pub fn refresh(&mut self, now: f64, interval: f64, build: impl FnOnce() -> Vec<T>) -> bool {
        if self.throttle.ready(now, interval) {
            self.items = build();
            true
        } else {
            false
        }
    }

    /// Drop the list and the schedule.
    pub fn clear(&mut self) {
        self.items.clear();
        self.throttle.reset();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}
