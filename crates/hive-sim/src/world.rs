//! The `SimWorld` struct and its tick loop.

use tracing::{debug, trace, warn};

use hive_behavior::Status;
use hive_core::{AgentId, BoidId, HiveError, SimClock, SimRng, Tick, Vec3};
use hive_flock::{FlockingSystem, FormationKind};
use hive_schedule::{
    EngineMetrics, EntityState, FixedTimestepEngine, FrameReport, Snapshot, StepHandler,
};

use crate::{AgentBody, Brain, Intent, Perception, SimObserver, SimResult, WorldConfig};

// ── Agent slot ────────────────────────────────────────────────────────────────

struct AgentSlot<A> {
    id:     AgentId,
    body:   A,
    boid:   Option<BoidId>,
    brain:  Option<Box<dyn Brain<A>>>,
    status: Status,
}

// ── World core ────────────────────────────────────────────────────────────────

/// Everything a fixed update touches.  Kept apart from the engine so the
/// engine can borrow it mutably as its step handler.
struct WorldCore<A> {
    clock:   SimClock,
    /// Registration order.
    agents:  Vec<AgentSlot<A>>,
    next_id: AgentId,
    flock:   FlockingSystem,

    // Per-tick scratch.
    intents:   Vec<(AgentId, Option<BoidId>, Intent)>,
    outbox:    Vec<Intent>,
    despawned: Vec<AgentId>,
}

// ── SimWorld ──────────────────────────────────────────────────────────────────

/// One self-contained simulation: agents with bodies and brains, the flock
/// that moves them, and the fixed-step engine that paces both.
///
/// Each fixed tick runs four phases:
///
/// 1. **Perceive**: every agent's body sees its boid's position and
///    velocity as of the start of the tick.
/// 2. **Think**: every agent with a brain runs it once.  Bodies queue
///    [`Intent`]s.
/// 3. **Apply**: queued intents are applied in agent registration order.
///    `Despawn` takes effect after all other intents.
/// 4. **Move**: the flock advances by the fixed step.
///
/// Several worlds can coexist; nothing here is global.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder] or [`SimWorld::new`].
pub struct SimWorld<A: AgentBody> {
    config: WorldConfig,
    engine: FixedTimestepEngine,
    rng:    SimRng,
    state:  WorldCore<A>,
}

impl<A: AgentBody> SimWorld<A> {
    /// An empty world.
    pub fn new(config: WorldConfig) -> SimResult<Self> {
        config.validate()?;
        let engine = FixedTimestepEngine::new(config.engine.clone())?;
        let flock = FlockingSystem::new(config.seeded_flock())?;
        let rng = SimRng::new(config.seed);
        let clock = SimClock::new(config.engine.fixed_step);

        Ok(Self {
            config,
            engine,
            rng,
            state: WorldCore {
                clock,
                agents: Vec::new(),
                next_id: AgentId(0),
                flock,
                intents: Vec::new(),
                outbox: Vec::new(),
                despawned: Vec::new(),
            },
        })
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add an agent.  With a `position` the agent also gets a boid there.
    pub fn spawn(&mut self, body: A, position: Option<Vec3>) -> AgentId {
        let id = self.state.next_id;
        self.state.next_id = id.next();

        let boid = position.map(|p| self.state.flock.add_boid(p));
        debug!(agent = %id, boid = ?boid, "agent spawned");

        self.state.agents.push(AgentSlot { id, body, boid, brain: None, status: Status::Idle });
        id
    }

    /// Attach (or replace) an agent's brain.
    pub fn set_brain(&mut self, id: AgentId, brain: impl Brain<A> + 'static) -> SimResult<()> {
        self.set_boxed_brain(id, Box::new(brain))
    }

    pub fn set_boxed_brain(&mut self, id: AgentId, brain: Box<dyn Brain<A>>) -> SimResult<()> {
        self.slot_mut(id)?.brain = Some(brain);
        Ok(())
    }

    /// Detach an agent's brain.  The agent keeps moving with the flock.
    pub fn clear_brain(&mut self, id: AgentId) -> SimResult<()> {
        self.slot_mut(id)?.brain = None;
        Ok(())
    }

    /// Remove an agent and its boid, returning the body.
    pub fn despawn(&mut self, id: AgentId) -> SimResult<A> {
        let slot = self.state.remove(id)?;
        Ok(slot.body)
    }

    pub fn agent_count(&self) -> usize {
        self.state.agents.len()
    }

    /// Agent ids in registration order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.state.agents.iter().map(|s| s.id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.state.slot_of(id).is_some()
    }

    pub fn body(&self, id: AgentId) -> Option<&A> {
        self.state.slot_of(id).map(|i| &self.state.agents[i].body)
    }

    pub fn body_mut(&mut self, id: AgentId) -> Option<&mut A> {
        self.slot_mut(id).ok().map(|s| &mut s.body)
    }

    pub fn boid_of(&self, id: AgentId) -> Option<BoidId> {
        self.state.slot_of(id).and_then(|i| self.state.agents[i].boid)
    }

    /// Status returned by the agent's brain on the last tick.
    pub fn brain_status(&self, id: AgentId) -> Option<Status> {
        self.state.slot_of(id).map(|i| self.state.agents[i].status)
    }

    /// What the agent's brain is currently doing, if it has one.
    pub fn activity(&self, id: AgentId) -> Option<&str> {
        let slot = &self.state.agents[self.state.slot_of(id)?];
        slot.brain.as_deref().map(|b| b.activity())
    }

    /// Simulated position of the agent's boid after the last tick.
    pub fn position(&self, id: AgentId) -> Option<Vec3> {
        let boid = self.boid_of(id)?;
        self.state.flock.boid(boid).map(|b| b.position)
    }

    pub fn velocity(&self, id: AgentId) -> Option<Vec3> {
        let boid = self.boid_of(id)?;
        self.state.flock.boid(boid).map(|b| b.velocity)
    }

    /// Render position blended between the last two fixed ticks by the
    /// engine's alpha.
    pub fn interpolated_position(&self, id: AgentId) -> Option<Vec3> {
        self.engine.interpolate_position(id)
    }

    fn slot_mut(&mut self, id: AgentId) -> SimResult<&mut AgentSlot<A>> {
        let i = self.state.slot_of(id).ok_or(HiveError::AgentNotFound(id))?;
        Ok(&mut self.state.agents[i])
    }

    // ── Flock control ─────────────────────────────────────────────────────

    pub fn set_flock_target(&mut self, target: Vec3) {
        self.state.flock.set_target(target);
    }

    pub fn clear_flock_target(&mut self) {
        self.state.flock.clear_target();
    }

    /// Give every boid a formation slot as its personal seek target.
    pub fn assign_formation(&mut self, kind: FormationKind, center: Vec3, spacing: f32) {
        self.state.flock.assign_formation(kind, center, spacing);
    }

    pub fn clear_formation(&mut self) {
        self.state.flock.clear_formation();
    }

    pub fn flock(&self) -> &FlockingSystem {
        &self.state.flock
    }

    /// Flat `[x, y, z, 1]` per boid in registration order.
    pub fn positions(&self) -> Vec<f32> {
        self.state.flock.get_positions()
    }

    // ── Driving ───────────────────────────────────────────────────────────

    pub fn start(&mut self, now: f64) {
        self.engine.start(now);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn resume(&mut self, now: f64) {
        self.engine.resume(now);
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    /// Feed one host frame to the engine.  Runs as many fixed ticks as the
    /// elapsed time allows (up to the substep cap).
    ///
    /// Returns `None` if the world has not been started.
    pub fn frame<O: SimObserver>(
        &mut self,
        timestamp: f64,
        observer:  &mut O,
    ) -> Option<FrameReport> {
        let mut driver = Driver { state: &mut self.state, observer };
        let report = self.engine.frame(timestamp, &mut driver)?;
        observer.on_frame(&report);
        Some(report)
    }

    /// Run exactly `n` fixed ticks, bypassing the engine's wall-clock pacing.
    ///
    /// Useful for tests, headless batch runs and incremental stepping.
    /// Interpolation snapshots are not updated.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        let dt = self.config.engine.fixed_step;
        for _ in 0..n {
            self.state.tick(dt, observer);
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The next tick to run.
    pub fn tick(&self) -> Tick {
        self.state.clock.current_tick
    }

    pub fn clock(&self) -> &SimClock {
        &self.state.clock
    }

    pub fn metrics(&self) -> EngineMetrics {
        self.engine.metrics()
    }

    pub fn reset_metrics(&mut self) {
        self.engine.reset_metrics();
    }

    pub fn engine(&self) -> &FixedTimestepEngine {
        &self.engine
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Scenario RNG seeded from the master seed, for spawn layouts and
    /// other setup draws.
    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }
}

// ── Tick processing ───────────────────────────────────────────────────────────

impl<A: AgentBody> WorldCore<A> {
    /// Agent ids are handed out in increasing order and removal preserves
    /// order, so the agent list is sorted by id.
    fn slot_of(&self, id: AgentId) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |s| s.id).ok()
    }

    fn remove(&mut self, id: AgentId) -> SimResult<AgentSlot<A>> {
        let i = self.slot_of(id).ok_or(HiveError::AgentNotFound(id))?;
        let slot = self.agents.remove(i);
        if let Some(boid) = slot.boid {
            self.flock.remove_boid(boid)?;
        }
        debug!(agent = %id, "agent despawned");
        Ok(slot)
    }

    fn tick<O: SimObserver + ?Sized>(&mut self, dt: f64, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let thought = self.think(now, dt);
        self.apply_intents(now, observer);
        self.flock.update(dt as f32);

        trace!(tick = %now, agents = self.agents.len(), thought, "tick complete");
        observer.on_tick_end(now, thought);
        self.clock.advance();
    }

    /// Perceive and think for every agent in registration order.  Returns
    /// how many brains ran.
    fn think(&mut self, now: Tick, dt: f64) -> usize {
        let flock = &self.flock;
        let outbox = &mut self.outbox;
        let intents = &mut self.intents;
        let flock_target = flock.target();

        intents.clear();
        let mut thought = 0;

        for slot in &mut self.agents {
            let kin = slot.boid.and_then(|b| flock.boid(b));
            let perception = Perception {
                tick:         now,
                position:     kin.map(|b| b.position),
                velocity:     kin.map(|b| b.velocity),
                flock_target,
            };
            slot.body.perceive(&perception);

            if let Some(brain) = slot.brain.as_mut() {
                slot.status = brain.think(&mut slot.body, dt);
                thought += 1;
            }

            outbox.clear();
            slot.body.drain_intents(outbox);
            intents.extend(outbox.drain(..).map(|i| (slot.id, slot.boid, i)));
        }

        thought
    }

    fn apply_intents<O: SimObserver + ?Sized>(&mut self, now: Tick, observer: &mut O) {
        self.despawned.clear();

        for (agent, boid, intent) in self.intents.drain(..) {
            match intent {
                // ── Intent: personal seek point ───────────────────────────
                Intent::SeekPosition(target) => {
                    if let Some(boid) = boid {
                        if let Err(e) = self.flock.set_seek_target(boid, Some(target)) {
                            warn!(agent = %agent, error = %e, "seek intent dropped");
                        }
                    }
                }
                Intent::StopSeeking => {
                    if let Some(boid) = boid {
                        if let Err(e) = self.flock.set_seek_target(boid, None) {
                            warn!(agent = %agent, error = %e, "stop-seeking intent dropped");
                        }
                    }
                }

                // ── Intent: shared flock target ───────────────────────────
                //
                // Last writer in registration order wins.
                Intent::SetFlockTarget(target) => self.flock.set_target(target),
                Intent::ClearFlockTarget => self.flock.clear_target(),

                // ── Intent: despawn (deferred) ────────────────────────────
                Intent::Despawn => {
                    if !self.despawned.contains(&agent) {
                        self.despawned.push(agent);
                    }
                }
            }
        }

        let despawned = std::mem::take(&mut self.despawned);
        for &agent in &despawned {
            match self.remove(agent) {
                Ok(_) => observer.on_despawn(now, agent),
                Err(e) => warn!(agent = %agent, error = %e, "despawn failed"),
            }
        }
        self.despawned = despawned;
    }

    /// Record every boid-linked agent's position and heading.
    fn capture(&self, snapshot: &mut Snapshot) {
        for slot in &self.agents {
            let Some(boid) = slot.boid.and_then(|b| self.flock.boid(b)) else {
                continue;
            };
            snapshot.insert(slot.id, EntityState {
                position: boid.position,
                rotation: boid.heading(),
            });
        }
    }
}

// ── Engine adapter ────────────────────────────────────────────────────────────

/// Borrows the world state and the caller's observer for the duration of
/// one engine frame.
struct Driver<'a, A, O: ?Sized> {
    state:    &'a mut WorldCore<A>,
    observer: &'a mut O,
}

impl<A: AgentBody, O: SimObserver + ?Sized> StepHandler for Driver<'_, A, O> {
    fn fixed_update(&mut self, dt: f64) {
        self.state.tick(dt, self.observer);
    }

    fn capture(&self, snapshot: &mut Snapshot) {
        self.state.capture(snapshot);
    }
}
