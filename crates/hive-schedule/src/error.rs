use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("fixed step must be positive and finite, got {0}")]
    InvalidFixedStep(f64),

    #[error("max substeps must be at least 1")]
    ZeroSubsteps,

    #[error("max frame dt must be positive, got {0}")]
    InvalidMaxFrameDt(f64),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
