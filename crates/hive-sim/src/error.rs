use hive_behavior::BehaviorError;
use hive_core::HiveError;
use hive_flock::FlockError;
use hive_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] HiveError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("scheduler error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("flock error: {0}")]
    Flock(#[from] FlockError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
