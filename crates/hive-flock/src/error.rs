use hive_core::BoidId;
use hive_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("flock parameter `{name}` is invalid: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("boid {0} not found")]
    BoidNotFound(BoidId),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type FlockResult<T> = Result<T, FlockError>;
