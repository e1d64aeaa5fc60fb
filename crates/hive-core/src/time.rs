//! Simulation tick counter.
//!
//! Fixed-step time is represented as a monotonically increasing `Tick`
//! counter plus the step length in seconds:
//!
//!   sim_time = tick * fixed_step
//!
//! Counting ticks as integers keeps "how many fixed updates have run" exact
//! regardless of how the frame times that produced them were sliced.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute fixed-update counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps tick counts to simulated seconds for one fixed step length.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds of simulated time per tick.
    pub fixed_step: f64,
    /// The current tick, advanced by `SimClock::advance()` each fixed update.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(fixed_step: f64) -> Self {
        Self { fixed_step, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.fixed_step
    }

    /// How many whole ticks fit in `secs` (rounds up, so a timer never
    /// fires early).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs / self.fixed_step).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}s)", self.current_tick, self.elapsed_secs())
    }
}
