//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `HiveError` as one
//! variant where they need to surface a core failure.

use thiserror::Error;

use crate::{AgentId, BoidId};

/// The top-level error type for `hive-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HiveError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("boid {0} not found")]
    BoidNotFound(BoidId),

    #[error("configuration error: {0}")]
    Config(String),
}
