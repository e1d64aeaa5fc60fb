//! Time sources feeding frame timestamps to the engine.

use std::time::Instant;

/// Anything that can report "now" in seconds on a monotonic timeline.
pub trait TimeSource {
    fn now_secs(&self) -> f64;
}

/// Wall-clock time since construction.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.  Used by tests and replays that
/// feed synthetic frame times.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    /// Move forward by `dt` seconds and return the new time.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.now += dt;
        self.now
    }

    pub fn set(&mut self, now: f64) {
        self.now = now;
    }
}

impl TimeSource for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now
    }
}
