//! Fluent builder for constructing a populated [`SimWorld`].

use hive_core::{AgentId, Vec3};

use crate::{AgentBody, Brain, SimError, SimResult, SimWorld, WorldConfig};

type BrainFactory<'a, A> = Box<dyn FnMut(AgentId, &A) -> Option<Box<dyn Brain<A>>> + 'a>;

/// Fluent builder for [`SimWorld<A>`].
///
/// # Required inputs
///
/// - [`WorldConfig`]: engine, flock and planner settings plus the seed
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                   |
/// |-------------------|-------------------------------------------|
/// | `.bodies(v)`      | No agents                                 |
/// | `.positions(v)`   | No boids; must match `bodies` if given    |
/// | `.brains(f)`      | No brains                                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(config)
///     .bodies(bodies)
///     .positions(spawn_points)
///     .brains(|_, _| Some(Box::new(TreeBrain::new(TreeInstance::new(tree.clone())))))
///     .build()?;
/// world.run_ticks(600, &mut NoopObserver);
/// ```
pub struct WorldBuilder<'a, A: AgentBody> {
    config:    WorldConfig,
    bodies:    Vec<A>,
    positions: Option<Vec<Vec3>>,
    brains:    Option<BrainFactory<'a, A>>,
}

impl<'a, A: AgentBody> WorldBuilder<'a, A> {
    pub fn new(config: WorldConfig) -> Self {
        Self { config, bodies: Vec::new(), positions: None, brains: None }
    }

    /// Agents to spawn, in registration order.
    pub fn bodies(mut self, bodies: Vec<A>) -> Self {
        self.bodies = bodies;
        self
    }

    /// One boid spawn point per body.
    pub fn positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Called once per spawned agent; `None` leaves the agent brainless.
    pub fn brains(
        mut self,
        factory: impl FnMut(AgentId, &A) -> Option<Box<dyn Brain<A>>> + 'a,
    ) -> Self {
        self.brains = Some(Box::new(factory));
        self
    }

    /// Validate inputs, spawn every agent and return a ready-to-start world.
    pub fn build(self) -> SimResult<SimWorld<A>> {
        let agent_count = self.bodies.len();

        // ── Validate optional inputs ──────────────────────────────────────
        if let Some(p) = &self.positions {
            if p.len() != agent_count {
                return Err(SimError::AgentCountMismatch {
                    expected: agent_count,
                    got:      p.len(),
                    what:     "spawn positions",
                });
            }
        }

        // ── Spawn ─────────────────────────────────────────────────────────
        let mut world = SimWorld::new(self.config)?;
        let mut positions = self.positions.map(Vec::into_iter);
        let mut brains = self.brains;

        for body in self.bodies {
            let position = positions.as_mut().and_then(Iterator::next);
            let id = world.spawn(body, position);

            let brain = match (brains.as_mut(), world.body(id)) {
                (Some(factory), Some(body)) => factory(id, body),
                _ => None,
            };
            if let Some(brain) = brain {
                world.set_boxed_brain(id, brain)?;
            }
        }

        Ok(world)
    }
}
