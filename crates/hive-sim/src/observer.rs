//! World observer trait for progress reporting and data collection.

use hive_core::{AgentId, Tick};
use hive_schedule::FrameReport;

/// Callbacks invoked by [`SimWorld`][crate::SimWorld] during frames and
/// ticks.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: overload watcher
///
/// ```rust
/// use hive_schedule::FrameReport;
/// use hive_sim::SimObserver;
///
/// #[derive(Default)]
/// struct Overload { capped_frames: u32 }
///
/// impl SimObserver for Overload {
///     fn on_frame(&mut self, report: &FrameReport) {
///         if report.capped {
///             self.capped_frames += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each fixed tick.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each fixed tick.  `thought` is the number of
    /// agents whose brain ran.
    fn on_tick_end(&mut self, _tick: Tick, _thought: usize) {}

    /// Called after every engine frame that ran (including paused frames).
    fn on_frame(&mut self, _report: &FrameReport) {}

    /// Called when an agent is removed by a `Despawn` intent.
    fn on_despawn(&mut self, _tick: Tick, _agent: AgentId) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
