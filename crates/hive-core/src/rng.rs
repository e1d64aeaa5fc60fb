//! Seeded random streams for boids, agents and scenario setup.
//!
//! # Stream derivation
//!
//! Each agent (or boid) gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (id * MIXING_CONSTANT)
//!
//! Multiplying by the golden-ratio constant scatters neighbouring ids far
//! apart in seed space.  Consequences:
//!
//! - Agents never share RNG state, so the order in which agents are
//!   processed within a tick cannot change what any one of them draws.
//! - Spawning more agents does not disturb the streams of existing ones.
//! - Wander jitter and spawn velocities replay identically for a given seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, BoidId};

/// `2^64 / phi`, rounded to odd.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// One boid's (or agent's) private random stream.
///
/// Stored in a parallel `Vec` alongside the state it perturbs so that a
/// read-only borrow of all kinematics and a mutable borrow of one agent's RNG
/// can coexist.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and a raw id.
    pub fn from_seed_and_id(global_seed: u64, id: u32) -> Self {
        let seed = global_seed ^ (id as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for a world agent.
    pub fn for_agent(global_seed: u64, agent: AgentId) -> Self {
        Self::from_seed_and_id(global_seed, agent.0)
    }

    /// Seed for a flocking boid.
    pub fn for_boid(global_seed: u64, boid: BoidId) -> Self {
        Self::from_seed_and_id(global_seed, boid.0)
    }

    /// A value from rand's `Standard` distribution for `T`.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform draw from `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform `f32` in `[-0.5, 0.5)`.  The jitter shape used by wander.
    #[inline]
    pub fn centered(&mut self) -> f32 {
        self.0.r#gen::<f32>() - 0.5
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (spawn placement, scenario
/// setup).
///
/// Used only in single-threaded contexts.  Derive per-agent streams with
/// [`AgentRng`] instead of sharing this one.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
