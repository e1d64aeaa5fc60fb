//! World intents: what an agent asks the world to do on its behalf.

use hive_core::Vec3;

/// Queued by agent bodies during the think phase and applied afterwards in
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Steer this agent's boid toward a point, overriding the flock target.
    SeekPosition(Vec3),
    /// Drop this agent's personal seek point.
    StopSeeking,
    /// Move the shared flock target.
    SetFlockTarget(Vec3),
    ClearFlockTarget,
    /// Remove this agent (and its boid) at the end of the tick.
    Despawn,
}
