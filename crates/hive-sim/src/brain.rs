//! Decision layers an agent can be driven by.
//!
//! A brain only ever touches its own agent's body.  Anything that affects
//! the world goes through the body's intent queue (see
//! [`AgentBody::drain_intents`]).

use hive_behavior::{FactKey, GoapAgent, Status, TreeInstance, WorldState};
use hive_core::{Tick, Vec3};

use crate::Intent;

// ── AgentBody ─────────────────────────────────────────────────────────────────

/// What the world knows about an agent at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub tick:         Tick,
    /// `None` for agents without a boid.
    pub position:     Option<Vec3>,
    pub velocity:     Option<Vec3>,
    pub flock_target: Option<Vec3>,
}

/// Per-agent game state owned by the world.
pub trait AgentBody {
    /// Called once per tick, before the agent's brain runs.
    fn perceive(&mut self, _perception: &Perception) {}

    /// Move every intent queued since the last call into `out`.
    fn drain_intents(&mut self, out: &mut Vec<Intent>);
}

// ── Brain ─────────────────────────────────────────────────────────────────────

/// A decision layer run once per tick against one agent's body.
pub trait Brain<A>: Send {
    fn think(&mut self, body: &mut A, dt: f64) -> Status;

    /// Forget any in-progress decision.
    fn reset(&mut self) {}

    /// Name of what the brain is currently doing, for logs and debug views.
    fn activity(&self) -> &str;
}

// ── TreeBrain ─────────────────────────────────────────────────────────────────

/// A behavior tree ticked once per fixed update.
pub struct TreeBrain<A> {
    instance: TreeInstance<A>,
    activity: String,
}

impl<A> TreeBrain<A> {
    pub fn new(instance: TreeInstance<A>) -> Self {
        Self { instance, activity: String::from("idle") }
    }

    pub fn instance(&self) -> &TreeInstance<A> {
        &self.instance
    }
}

impl<A> Brain<A> for TreeBrain<A> {
    fn think(&mut self, body: &mut A, dt: f64) -> Status {
        let status = self.instance.execute(body, dt);
        self.activity = deepest_running(&self.instance)
            .unwrap_or_else(|| status.to_string());
        status
    }

    fn reset(&mut self) {
        self.instance.reset();
        self.activity = String::from("idle");
    }

    fn activity(&self) -> &str {
        &self.activity
    }
}

/// Name of the deepest node left `Running`, following first running children
/// from the root.
fn deepest_running<A>(instance: &TreeInstance<A>) -> Option<String> {
    let tree = instance.tree();
    let state = instance.state();
    let mut node = tree.root();
    if state.status(node) != Status::Running {
        return None;
    }
    while let Some(&child) = tree
        .children(node)
        .iter()
        .find(|&&c| state.status(c) == Status::Running)
    {
        node = child;
    }
    tree.name(node).map(str::to_owned)
}

// ── GoapBrain ─────────────────────────────────────────────────────────────────

type SenseFn<A, K> = Box<dyn FnMut(&A, &mut WorldState<K>) + Send>;
type ActFn<A> = Box<dyn FnMut(&str, &mut A) + Send>;

/// A GOAP planner wired to a body.
///
/// Each tick `sense` copies facts from the body into the planner's state,
/// the planner advances (replanning when idle), and `act` is told which
/// action is now current so the body can queue intents for it.
pub struct GoapBrain<A, K: FactKey> {
    agent: GoapAgent<K>,
    sense: SenseFn<A, K>,
    act:   ActFn<A>,
}

impl<A, K: FactKey + Send> GoapBrain<A, K> {
    pub fn new(
        agent: GoapAgent<K>,
        sense: impl FnMut(&A, &mut WorldState<K>) + Send + 'static,
        act:   impl FnMut(&str, &mut A) + Send + 'static,
    ) -> Self {
        Self { agent, sense: Box::new(sense), act: Box::new(act) }
    }

    pub fn agent(&self) -> &GoapAgent<K> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut GoapAgent<K> {
        &mut self.agent
    }
}

impl<A, K: FactKey + Send> Brain<A> for GoapBrain<A, K> {
    fn think(&mut self, body: &mut A, dt: f64) -> Status {
        (self.sense)(body, self.agent.state_mut());
        self.agent.update(dt);
        if self.agent.is_idle() {
            return Status::Idle;
        }
        (self.act)(self.agent.current_action_name(), body);
        Status::Running
    }

    fn reset(&mut self) {
        // Re-planning from scratch drops the current plan.
        self.agent.plan();
    }

    fn activity(&self) -> &str {
        self.agent.current_action_name()
    }
}
