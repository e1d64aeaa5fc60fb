//! Goal-oriented action planning.
//!
//! An agent holds a [`WorldState`], goals sorted by priority and a library
//! of [`GoapAction`]s.  [`GoapAgent::plan`] searches forward from the
//! current state for the cheapest action sequence that satisfies the first
//! unmet goal it can reach; [`GoapAgent::update`] then runs that plan one
//! action at a time and replans from scratch whenever an action fails.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::{BehaviorError, BehaviorResult, Status};

// ── FactValue ─────────────────────────────────────────────────────────────────

/// A world-state value: a flag or a number.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactValue {
    Bool(bool),
    Num(f64),
}

impl FactValue {
    /// Flags as-is; numbers are truthy when non-zero.
    pub fn as_bool(self) -> bool {
        match self {
            FactValue::Bool(b) => b,
            FactValue::Num(n) => n != 0.0,
        }
    }

    pub fn as_num(self) -> Option<f64> {
        match self {
            FactValue::Num(n) => Some(n),
            FactValue::Bool(_) => None,
        }
    }

    /// Bit pattern used for equality and hashing; `-0.0` folds onto `0.0`.
    fn num_bits(n: f64) -> u64 {
        if n == 0.0 { 0 } else { n.to_bits() }
    }
}

impl PartialEq for FactValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FactValue::Bool(a), FactValue::Bool(b)) => a == b,
            (FactValue::Num(a), FactValue::Num(b)) => Self::num_bits(*a) == Self::num_bits(*b),
            _ => false,
        }
    }
}

impl Eq for FactValue {}

impl Hash for FactValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            FactValue::Bool(b) => {
                0u8.hash(state);
                b.hash(state);
            }
            FactValue::Num(n) => {
                1u8.hash(state);
                Self::num_bits(*n).hash(state);
            }
        }
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl From<f64> for FactValue {
    fn from(n: f64) -> Self {
        FactValue::Num(n)
    }
}

impl From<i32> for FactValue {
    fn from(n: i32) -> Self {
        FactValue::Num(n as f64)
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{b}"),
            FactValue::Num(n) => write!(f, "{n}"),
        }
    }
}

// ── WorldState ────────────────────────────────────────────────────────────────

/// Bounds for world-state keys.  Blanket-implemented; use a small enum.
pub trait FactKey: Ord + Hash + Clone + fmt::Debug {}

impl<T: Ord + Hash + Clone + fmt::Debug> FactKey for T {}

/// A sorted fact map.  Sorting makes equality and hashing canonical, which
/// is what the planner's visited set relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldState<K: FactKey> {
    facts: BTreeMap<K, FactValue>,
}

impl<K: FactKey> Default for WorldState<K> {
    fn default() -> Self {
        Self { facts: BTreeMap::new() }
    }
}

impl<K: FactKey> WorldState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: K, value: impl Into<FactValue>) {
        self.facts.insert(key, value.into());
    }

    pub fn get(&self, key: &K) -> Option<FactValue> {
        self.facts.get(key).copied()
    }

    /// `false` for missing keys.
    pub fn is_true(&self, key: &K) -> bool {
        self.get(key).is_some_and(FactValue::as_bool)
    }

    pub fn num(&self, key: &K) -> Option<f64> {
        self.get(key).and_then(FactValue::as_num)
    }

    /// Every `(key, value)` pair is present with exactly that value.
    pub fn satisfies(&self, conditions: &[(K, FactValue)]) -> bool {
        conditions.iter().all(|(k, v)| self.facts.get(k) == Some(v))
    }

    /// Overwrite with every `(key, value)` pair.
    pub fn apply(&mut self, effects: &[(K, FactValue)]) {
        for (k, v) in effects {
            self.facts.insert(k.clone(), *v);
        }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &FactValue)> {
        self.facts.iter()
    }
}

// ── GoapAction ────────────────────────────────────────────────────────────────

type Executor<K> = Box<dyn FnMut(&WorldState<K>, f64) -> Status + Send>;

/// An action in a [`GoapAgent`]'s library.
///
/// ```rust
/// use hive_behavior::GoapAction;
///
/// let find = GoapAction::new("FindWeapon")
///     .requires("has_weapon", false)
///     .effect("has_weapon", true)
///     .cost(3.0);
/// assert_eq!(find.name(), "FindWeapon");
/// ```
pub struct GoapAction<K: FactKey> {
    name:          String,
    preconditions: Vec<(K, FactValue)>,
    effects:       Vec<(K, FactValue)>,
    cost:          f64,
    executor:      Option<Executor<K>>,
}

impl<K: FactKey> GoapAction<K> {
    /// A free action with no preconditions or effects and cost 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:          name.into(),
            preconditions: Vec::new(),
            effects:       Vec::new(),
            cost:          1.0,
            executor:      None,
        }
    }

    pub fn requires(mut self, key: K, value: impl Into<FactValue>) -> Self {
        self.preconditions.push((key, value.into()));
        self
    }

    pub fn effect(mut self, key: K, value: impl Into<FactValue>) -> Self {
        self.effects.push((key, value.into()));
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Attach a per-tick body.  Without one the action completes with
    /// `Success` the first time it runs.
    pub fn executor(
        mut self,
        f: impl FnMut(&WorldState<K>, f64) -> Status + Send + 'static,
    ) -> Self {
        self.executor = Some(Box::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[(K, FactValue)] {
        &self.preconditions
    }

    pub fn effects(&self) -> &[(K, FactValue)] {
        &self.effects
    }

    pub fn action_cost(&self) -> f64 {
        self.cost
    }

    fn run(&mut self, state: &WorldState<K>, dt: f64) -> Status {
        match self.executor.as_mut() {
            Some(f) => f(state, dt),
            None => Status::Success,
        }
    }
}

impl<K: FactKey> fmt::Debug for GoapAction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapAction")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .field("cost", &self.cost)
            .finish()
    }
}

// ── Goals ─────────────────────────────────────────────────────────────────────

type GoalFn<K> = Box<dyn Fn(&WorldState<K>) -> bool + Send + Sync>;

struct Goal<K: FactKey> {
    name:      String,
    condition: GoalFn<K>,
    priority:  f64,
}

// ── GoapConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GoapConfig {
    /// Longest plan the search will consider.  Default: 10.
    pub max_plan_length: usize,
}

impl Default for GoapConfig {
    fn default() -> Self {
        Self { max_plan_length: 10 }
    }
}

impl GoapConfig {
    pub fn validate(&self) -> BehaviorResult<()> {
        if self.max_plan_length == 0 {
            return Err(BehaviorError::Config("max_plan_length must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Search frontier ───────────────────────────────────────────────────────────

/// Heap entry ordered by (cost, discovery order), smallest first.
struct Frontier {
    cost: f64,
    seq:  u64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the cheapest, earliest entry.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct SearchNode<K: FactKey> {
    state: WorldState<K>,
    plan:  Vec<usize>,
}

// ── GoapAgent ─────────────────────────────────────────────────────────────────

pub struct GoapAgent<K: FactKey> {
    config:  GoapConfig,
    state:   WorldState<K>,
    goals:   Vec<Goal<K>>,
    actions: Vec<GoapAction<K>>,
    /// Indices into `actions`; the front is the current action.
    plan:    VecDeque<usize>,
    goal:    Option<usize>,
}

impl<K: FactKey> Default for GoapAgent<K> {
    fn default() -> Self {
        Self {
            config:  GoapConfig::default(),
            state:   WorldState::new(),
            goals:   Vec::new(),
            actions: Vec::new(),
            plan:    VecDeque::new(),
            goal:    None,
        }
    }
}

impl<K: FactKey> GoapAgent<K> {
    pub fn new(config: GoapConfig) -> BehaviorResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    // ── World state ───────────────────────────────────────────────────────

    pub fn set_state(&mut self, key: K, value: impl Into<FactValue>) {
        self.state.set(key, value);
    }

    pub fn get_state(&self, key: &K) -> Option<FactValue> {
        self.state.get(key)
    }

    pub fn state(&self) -> &WorldState<K> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WorldState<K> {
        &mut self.state
    }

    // ── Library ───────────────────────────────────────────────────────────

    /// Register a goal.  Goals stay sorted by descending priority; equal
    /// priorities keep insertion order.  A plan already in progress keeps
    /// its goal until the next replan.
    pub fn add_goal(
        &mut self,
        name:      impl Into<String>,
        condition: impl Fn(&WorldState<K>) -> bool + Send + Sync + 'static,
        priority:  f64,
    ) {
        let at = self.goals.partition_point(|g| g.priority.total_cmp(&priority).is_ge());
        self.goals.insert(at, Goal {
            name: name.into(),
            condition: Box::new(condition),
            priority,
        });
        if let Some(gi) = self.goal.as_mut() {
            if *gi >= at {
                *gi += 1;
            }
        }
    }

    /// Register an action.  Costs must be finite and non-negative so the
    /// cost-ordered search stays sound.
    pub fn add_action(&mut self, action: GoapAction<K>) -> BehaviorResult<()> {
        if !(action.cost.is_finite() && action.cost >= 0.0) {
            return Err(BehaviorError::InvalidCost { name: action.name, cost: action.cost });
        }
        self.actions.push(action);
        Ok(())
    }

    pub fn actions(&self) -> &[GoapAction<K>] {
        &self.actions
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Choose a new plan, discarding the current one.
    ///
    /// Goals are tried in priority order.  A goal that already holds ends
    /// planning with an empty plan; an unmet goal with a reachable plan
    /// commits to that plan.  If no goal is reachable the agent idles.
    pub fn plan(&mut self) {
        self.plan.clear();
        self.goal = None;

        for (gi, goal) in self.goals.iter().enumerate() {
            if (goal.condition)(&self.state) {
                trace!(goal = %goal.name, "goal already satisfied");
                return;
            }
            if let Some(plan) = self.find_plan(&goal.condition) {
                debug!(goal = %goal.name, steps = plan.len(), "GOAP plan selected");
                self.plan = plan.into();
                self.goal = Some(gi);
                return;
            }
        }

        debug!("no reachable GOAP goal, idling");
    }

    /// Cost-ordered search from the current state.  Equal-cost entries pop
    /// in discovery order, so among equally cheap plans the one whose
    /// actions come first in the library wins.
    fn find_plan(&self, goal: &GoalFn<K>) -> Option<Vec<usize>> {
        let mut nodes: Vec<SearchNode<K>> = vec![SearchNode {
            state: self.state.clone(),
            plan:  Vec::new(),
        }];
        let mut heap = BinaryHeap::new();
        let mut visited: FxHashSet<WorldState<K>> = FxHashSet::default();
        let mut seq = 0u64;
        heap.push(Frontier { cost: 0.0, seq, node: 0 });

        while let Some(Frontier { cost, node, .. }) = heap.pop() {
            let (state, plan) = {
                let n = &nodes[node];
                (n.state.clone(), n.plan.clone())
            };
            if !visited.insert(state.clone()) {
                continue;
            }
            if goal(&state) {
                return if plan.is_empty() { None } else { Some(plan) };
            }
            if plan.len() >= self.config.max_plan_length {
                continue;
            }

            for (ai, action) in self.actions.iter().enumerate() {
                if !state.satisfies(&action.preconditions) {
                    continue;
                }
                let mut next = state.clone();
                next.apply(&action.effects);
                let mut next_plan = plan.clone();
                next_plan.push(ai);

                seq += 1;
                nodes.push(SearchNode { state: next, plan: next_plan });
                heap.push(Frontier { cost: cost + action.cost, seq, node: nodes.len() - 1 });
            }
        }

        None
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Run the current action for `dt`, or plan if there is none.
    ///
    /// On success the action's effects are merged into the world state and
    /// the next queued action becomes current.  On failure the whole plan is
    /// discarded and a new one chosen immediately.
    pub fn update(&mut self, dt: f64) {
        let Some(&ai) = self.plan.front() else {
            self.plan();
            return;
        };

        let action = &mut self.actions[ai];
        match action.run(&self.state, dt) {
            Status::Success => {
                trace!(action = %action.name, "GOAP action succeeded");
                self.state.apply(&action.effects);
                self.plan.pop_front();
                if self.plan.is_empty() {
                    self.goal = None;
                }
            }
            Status::Failure => {
                debug!(action = %action.name, "GOAP action failed, replanning");
                self.plan();
            }
            Status::Running | Status::Idle => {}
        }
    }

    /// Name of the current action, or `"idle"`.
    pub fn current_action_name(&self) -> &str {
        self.plan
            .front()
            .map_or("idle", |&ai| self.actions[ai].name.as_str())
    }

    /// Names of the current and queued actions, in order.
    pub fn current_plan(&self) -> Vec<&str> {
        self.plan.iter().map(|&ai| self.actions[ai].name.as_str()).collect()
    }

    /// Name of the goal the current plan works toward.
    pub fn current_goal_name(&self) -> Option<&str> {
        self.goal.map(|gi| self.goals[gi].name.as_str())
    }

    pub fn is_idle(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn config(&self) -> &GoapConfig {
        &self.config
    }
}

impl<K: FactKey> fmt::Debug for GoapAgent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapAgent")
            .field("state", &self.state)
            .field("goals", &self.goals.iter().map(|g| &g.name).collect::<Vec<_>>())
            .field("actions", &self.actions.len())
            .field("plan", &self.current_plan())
            .finish()
    }
}
