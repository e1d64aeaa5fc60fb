//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `hive-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
