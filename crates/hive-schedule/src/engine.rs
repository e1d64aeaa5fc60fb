//! The fixed-timestep engine.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, warn};

use hive_core::{AgentId, Vec3};

use crate::{EngineMetrics, ScheduleError, ScheduleResult, Snapshot, StateProperty, StepHandler};

/// Frames kept for the rolling fps average.
const FPS_WINDOW: usize = 60;

// ── EngineConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Seconds simulated by one fixed update.  Default: 1/60.
    pub fixed_step: f64,
    /// Most fixed updates run in one frame before the backlog is dropped.
    /// Default: 3.
    pub max_substeps: u32,
    /// Capture snapshots and compute a real alpha.  Default: true.
    pub interpolate: bool,
    /// Upper bound on one frame's delta; longer gaps (tab switch, debugger
    /// pause) are treated as this long.  Default: 0.25 s.
    pub max_frame_dt: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_step:   1.0 / 60.0,
            max_substeps: 3,
            interpolate:  true,
            max_frame_dt: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(ScheduleError::InvalidFixedStep(self.fixed_step));
        }
        if self.max_substeps == 0 {
            return Err(ScheduleError::ZeroSubsteps);
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(ScheduleError::InvalidMaxFrameDt(self.max_frame_dt));
        }
        Ok(())
    }
}

// ── FrameReport ───────────────────────────────────────────────────────────────

/// What one call to [`FixedTimestepEngine::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Clamped frame delta, seconds.
    pub dt:            f64,
    /// Fixed updates run this frame.
    pub fixed_updates: u32,
    /// Interpolation alpha handed to render.
    pub alpha:         f64,
    /// `true` if the substep cap discarded time this frame.
    pub capped:        bool,
    /// `true` if the engine was paused (render only).
    pub paused:        bool,
}

// ── FixedTimestepEngine ───────────────────────────────────────────────────────

/// Runs a [`StepHandler`] at a constant step size regardless of how often
/// or how irregularly [`frame`][Self::frame] is called.
///
/// The engine is a plain value with no globals: several engines can run side
/// by side, each driven by its own host callback.
pub struct FixedTimestepEngine {
    config: EngineConfig,

    accumulator:  f64,
    current_time: f64,
    last_time:    f64,
    alpha:        f64,

    previous: Option<Snapshot>,
    current:  Option<Snapshot>,

    running: bool,
    paused:  bool,

    metrics:     EngineMetrics,
    fps_history: VecDeque<f64>,
}

impl FixedTimestepEngine {
    pub fn new(config: EngineConfig) -> ScheduleResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator:  0.0,
            current_time: 0.0,
            last_time:    0.0,
            alpha:        1.0,
            previous:     None,
            current:      None,
            running:      false,
            paused:       false,
            metrics:      EngineMetrics::default(),
            fps_history:  VecDeque::with_capacity(FPS_WINDOW),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Begin accepting frames, treating `now` as the previous frame time.
    /// No-op if already running.
    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        self.current_time = now;
        self.last_time = now;
        self.accumulator = 0.0;
        self.metrics.total_time = 0.0;
        self.metrics.total_frames = 0;
        debug!(fixed_step = self.config.fixed_step, "fixed-step engine started");
    }

    /// Stop accepting frames.  Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.running {
            debug!("fixed-step engine stopped");
        }
        self.running = false;
    }

    /// Suspend accumulation.  Frames still render with the last alpha.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`pause`][Self::pause].  The backlog is discarded and
    /// `now` becomes the previous frame time, so resuming never bursts
    /// catch-up updates.
    pub fn resume(&mut self, now: f64) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.last_time = now;
        self.accumulator = 0.0;
        debug!("fixed-step engine resumed");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Process one render-driver callback at `timestamp` seconds.
    ///
    /// Returns `None` when the engine is not running.
    pub fn frame<H: StepHandler + ?Sized>(
        &mut self,
        timestamp: f64,
        handler:   &mut H,
    ) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        self.current_time = timestamp;
        let dt = (timestamp - self.last_time).clamp(0.0, self.config.max_frame_dt);
        self.last_time = timestamp;

        if self.paused {
            let render_start = Instant::now();
            handler.render(self.alpha);
            self.metrics.render_time_ms = elapsed_ms(render_start);
            return Some(FrameReport {
                dt,
                fixed_updates: 0,
                alpha: self.alpha,
                capped: false,
                paused: true,
            });
        }

        self.accumulator += dt;

        let step = self.config.fixed_step;
        let physics_start = Instant::now();
        let mut steps: u32 = 0;
        let mut capped = false;

        while self.accumulator >= step {
            if steps >= self.config.max_substeps {
                capped = true;
                self.metrics.skipped_fixed_updates += 1;
                self.metrics.dropped_time += self.accumulator;
                if self.accumulator > step * 2.0 {
                    self.metrics.missed_frames += 1;
                }
                warn!(
                    dropped_secs = self.accumulator,
                    max_substeps = self.config.max_substeps,
                    "substep cap reached, dropping simulation time",
                );
                self.accumulator = 0.0;
                break;
            }

            if self.config.interpolate && steps == 0 {
                let mut snap = Snapshot::new(self.current_time - step);
                handler.capture(&mut snap);
                self.previous = Some(snap);
            }

            handler.fixed_update(step);
            self.accumulator -= step;
            steps += 1;
        }

        self.metrics.physics_time_ms = elapsed_ms(physics_start);
        self.metrics.fixed_updates += steps as u64;

        self.alpha = if self.config.interpolate { self.accumulator / step } else { 0.0 };
        let mut snap = Snapshot::new(self.current_time);
        handler.capture(&mut snap);
        self.current = Some(snap);

        let render_start = Instant::now();
        handler.render(self.alpha);
        self.metrics.render_time_ms = elapsed_ms(render_start);

        handler.late_update(dt);

        self.record_frame(dt);

        Some(FrameReport {
            dt,
            fixed_updates: steps,
            alpha: self.alpha,
            capped,
            paused: false,
        })
    }

    fn record_frame(&mut self, dt: f64) {
        if dt > 0.0 {
            if self.fps_history.len() == FPS_WINDOW {
                self.fps_history.pop_front();
            }
            self.fps_history.push_back(1.0 / dt);
            self.metrics.fps =
                self.fps_history.iter().sum::<f64>() / self.fps_history.len() as f64;
        }

        self.metrics.total_frames += 1;
        self.metrics.total_time += dt;
        self.metrics.avg_frame_time_ms =
            self.metrics.total_time / self.metrics.total_frames as f64 * 1000.0;
    }

    // ── Interpolation ─────────────────────────────────────────────────────

    /// Current interpolation alpha (0 when interpolation is disabled).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `property` of entity `id`, blended between the previous and current
    /// snapshots by alpha.
    ///
    /// Falls back to the current value when there is no previous capture
    /// of that entity.  `None` if the entity is absent from the current
    /// snapshot.
    pub fn interpolate_state(&self, id: AgentId, property: StateProperty) -> Option<f32> {
        let curr = self.current.as_ref()?.get(id)?.get(property);
        if !self.config.interpolate {
            return Some(curr);
        }
        match self.previous.as_ref().and_then(|s| s.get(id)) {
            Some(prev) => {
                let prev = prev.get(property);
                Some(prev + (curr - prev) * self.alpha as f32)
            }
            None => Some(curr),
        }
    }

    /// All three position components of `id`, interpolated.
    pub fn interpolate_position(&self, id: AgentId) -> Option<Vec3> {
        Some(Vec3::new(
            self.interpolate_state(id, StateProperty::X)?,
            self.interpolate_state(id, StateProperty::Y)?,
            self.interpolate_state(id, StateProperty::Z)?,
        ))
    }

    pub fn previous_snapshot(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    // ── Metrics ───────────────────────────────────────────────────────────

    pub fn metrics(&self) -> EngineMetrics {
        self.metrics
    }

    /// Clear the rolling fps window and the overload counters.
    pub fn reset_metrics(&mut self) {
        self.fps_history.clear();
        self.metrics.fps = 0.0;
        self.metrics.missed_frames = 0;
        self.metrics.fixed_updates = 0;
        self.metrics.skipped_fixed_updates = 0;
        self.metrics.dropped_time = 0.0;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Unconsumed simulation time, seconds.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

#[inline]
fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
