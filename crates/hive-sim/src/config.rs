//! World-level configuration.

use hive_behavior::GoapConfig;
use hive_flock::FlockConfig;
use hive_schedule::EngineConfig;

use crate::SimResult;

/// Everything needed to build a [`SimWorld`][crate::SimWorld].
///
/// With the `serde` feature this loads from JSON; missing sections take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Master seed.  Replaces `flock.seed` and seeds the world's scenario
    /// RNG.
    pub seed:   u64,
    pub engine: EngineConfig,
    pub flock:  FlockConfig,
    /// Defaults for GOAP agents built against this world.
    pub goap:   GoapConfig,
}

impl WorldConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.engine.validate()?;
        self.flock.validate()?;
        self.goap.validate()?;
        Ok(())
    }

    /// The flock configuration with the master seed applied.
    pub fn seeded_flock(&self) -> FlockConfig {
        FlockConfig { seed: self.seed, ..self.flock.clone() }
    }
}
