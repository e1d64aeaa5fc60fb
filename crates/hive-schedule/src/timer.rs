//! Small frame-rate independent timers.

// ── DeltaTimer ────────────────────────────────────────────────────────────────

/// Fires at a fixed rate from variable-length updates.
///
/// At most one firing is reported per [`update`][Self::update]; any excess
/// stays in the accumulator and fires on later updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTimer {
    rate:        f64,
    accumulator: f64,
}

impl DeltaTimer {
    /// `rate` is the period in seconds.
    pub fn new(rate: f64) -> Self {
        Self { rate, accumulator: 0.0 }
    }

    /// Accumulate `dt`; returns `true` if a period elapsed.
    pub fn update(&mut self, dt: f64) -> bool {
        self.accumulator += dt;
        if self.accumulator >= self.rate {
            self.accumulator -= self.rate;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Fraction of the current period elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.rate <= 0.0 {
            return 1.0;
        }
        (self.accumulator / self.rate).min(1.0)
    }
}

// ── Cooldown ──────────────────────────────────────────────────────────────────

/// A one-shot countdown.  Starts ready.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration:  f64,
    remaining: f64,
    ready:     bool,
}

impl Cooldown {
    pub fn new(duration: f64) -> Self {
        Self { duration, remaining: 0.0, ready: true }
    }

    /// Begin counting down.  `duration` overrides the stored duration for
    /// this and later starts.
    pub fn start(&mut self, duration: Option<f64>) {
        if let Some(d) = duration {
            self.duration = d;
        }
        self.remaining = self.duration;
        self.ready = false;
    }

    /// Count down by `dt`.  Returns `true` only on the update where the
    /// cooldown becomes ready.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.ready {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.ready = true;
            return true;
        }
        false
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Finish immediately.
    pub fn complete(&mut self) {
        self.remaining = 0.0;
        self.ready = true;
    }

    /// Abort the countdown.  Same effect as [`complete`][Self::complete]
    /// but reads better at call sites that cancel.
    pub fn cancel(&mut self) {
        self.complete();
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Fraction of the countdown elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.ready || self.duration <= 0.0 {
            return 1.0;
        }
        1.0 - self.remaining / self.duration
    }
}
