//! Per-engine performance counters.

/// Counters and rolling averages maintained by the engine.
///
/// Timing fields (`*_ms`) are wall-clock diagnostics and are never fed back
/// into the simulation.  `skipped_fixed_updates` and `dropped_time` are the
/// overload signal: they advance only when the substep cap discards
/// simulation time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineMetrics {
    /// Mean frames per second over the last 60 frames.
    pub fps:                   f64,
    pub avg_frame_time_ms:     f64,
    /// Wall time spent in fixed updates during the last frame.
    pub physics_time_ms:       f64,
    /// Wall time spent in render during the last frame.
    pub render_time_ms:        f64,
    /// Capped frames whose discarded backlog exceeded two steps.
    pub missed_frames:         u64,
    pub fixed_updates:         u64,
    /// Frames in which the substep cap was hit.
    pub skipped_fixed_updates: u64,
    /// Simulation seconds discarded by the substep cap.
    pub dropped_time:          f64,
    pub total_frames:          u64,
    /// Sum of clamped frame deltas, seconds.
    pub total_time:            f64,
}
