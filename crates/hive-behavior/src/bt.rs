//! Behavior trees: a shared arena definition plus per-agent state.
//!
//! ```text
//! BehaviorTree<A>   nodes: [Root(Selector), Flee(Sequence), LowHealth(Condition), ...]
//!                   children by NodeId, parent as a non-owning NodeId
//! TreeState         statuses[node], timers[node]     (one per agent)
//! ```
//!
//! Composite statuses are recomputed from the children every call; the only
//! state carried between ticks is the last status of each node (for
//! inspection) and the elapsed time of each `Wait` node.

use std::fmt;
use std::sync::Arc;

use hive_core::NodeId;

use crate::{BehaviorError, BehaviorResult, Status};

pub type ConditionFn<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;
pub type ActionFn<A> = Box<dyn Fn(&mut A, f64) -> Status + Send + Sync>;

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// The closed set of node kinds.
pub enum NodeKind<A> {
    /// Children in order until one fails or is running.
    Sequence,
    /// Children in order until one succeeds or is running.
    Selector,
    /// All children every call; succeeds once `required_success` of them
    /// succeeded this call, otherwise running.  Child failures do not fail
    /// the node.
    Parallel { required_success: usize },
    /// Swaps the first child's success and failure.  Fails with no child.
    Inverter,
    Condition(ConditionFn<A>),
    Action(ActionFn<A>),
    /// Running until `duration` seconds have accumulated, then succeeds once
    /// and restarts its timer.
    Wait { duration: f64 },
}

impl<A> NodeKind<A> {
    pub fn condition(f: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        NodeKind::Condition(Box::new(f))
    }

    pub fn action(f: impl Fn(&mut A, f64) -> Status + Send + Sync + 'static) -> Self {
        NodeKind::Action(Box::new(f))
    }

    /// A parallel node; a threshold of 0 is treated as 1.
    pub fn parallel(required_success: usize) -> Self {
        NodeKind::Parallel { required_success: required_success.max(1) }
    }

    pub fn wait(duration: f64) -> Self {
        NodeKind::Wait { duration }
    }

    /// Leaves may not have children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Condition(_) | NodeKind::Action(_) | NodeKind::Wait { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Sequence       => "sequence",
            NodeKind::Selector       => "selector",
            NodeKind::Parallel { .. } => "parallel",
            NodeKind::Inverter       => "inverter",
            NodeKind::Condition(_)   => "condition",
            NodeKind::Action(_)      => "action",
            NodeKind::Wait { .. }    => "wait",
        }
    }
}

impl<A> fmt::Debug for NodeKind<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Parallel { required_success } => {
                write!(f, "Parallel({required_success})")
            }
            NodeKind::Wait { duration } => write!(f, "Wait({duration})"),
            other => f.write_str(other.label()),
        }
    }
}

struct Node<A> {
    name:     String,
    kind:     NodeKind<A>,
    children: Vec<NodeId>,
    parent:   Option<NodeId>,
}

// ── BehaviorTree ──────────────────────────────────────────────────────────────

/// An immutable-once-built decision tree over agents of type `A`.
///
/// Build with [`new`][Self::new] (creates the root) and
/// [`add_child`][Self::add_child], then share behind an `Arc` and give each
/// agent its own [`TreeState`] or [`TreeInstance`].
pub struct BehaviorTree<A> {
    nodes: Vec<Node<A>>,
}

impl<A> BehaviorTree<A> {
    pub fn new(root_name: impl Into<String>, root: NodeKind<A>) -> Self {
        Self {
            nodes: vec![Node {
                name:     root_name.into(),
                kind:     root,
                children: Vec::new(),
                parent:   None,
            }],
        }
    }

    /// The root is always node 0.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name:   impl Into<String>,
        kind:   NodeKind<A>,
    ) -> BehaviorResult<NodeId> {
        let p = self
            .nodes
            .get(parent.index())
            .ok_or(BehaviorError::NodeNotFound(parent))?;
        if p.kind.is_leaf() {
            return Err(BehaviorError::LeafNode(parent));
        }

        let id = NodeId::try_from(self.nodes.len())
            .map_err(|_| BehaviorError::Config("behavior tree node limit reached".into()))?;
        self.nodes.push(Node {
            name: name.into(),
            kind,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind<A>> {
        self.nodes.get(id.index()).map(|n| &n.kind)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.index()).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    /// First node (in insertion order) called `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Evaluate the tree once from the root.
    pub fn execute(&self, agent: &mut A, dt: f64, state: &mut TreeState) -> Status {
        state.fit(self.nodes.len());
        self.execute_node(self.root(), agent, dt, state)
    }

    fn execute_node(&self, id: NodeId, agent: &mut A, dt: f64, state: &mut TreeState) -> Status {
        let node = &self.nodes[id.index()];
        let status = match &node.kind {
            NodeKind::Sequence => {
                let mut result = Status::Success;
                for &child in &node.children {
                    match self.execute_node(child, agent, dt, state) {
                        Status::Success => {}
                        other => {
                            result = other;
                            break;
                        }
                    }
                }
                result
            }
            NodeKind::Selector => {
                let mut result = Status::Failure;
                for &child in &node.children {
                    match self.execute_node(child, agent, dt, state) {
                        Status::Failure => {}
                        other => {
                            result = other;
                            break;
                        }
                    }
                }
                result
            }
            NodeKind::Parallel { required_success } => {
                let mut successes = 0;
                for &child in &node.children {
                    if self.execute_node(child, agent, dt, state) == Status::Success {
                        successes += 1;
                    }
                }
                if successes >= *required_success { Status::Success } else { Status::Running }
            }
            NodeKind::Inverter => match node.children.first() {
                Some(&child) => self.execute_node(child, agent, dt, state).invert(),
                None => Status::Failure,
            },
            NodeKind::Condition(pred) => {
                if pred(agent) { Status::Success } else { Status::Failure }
            }
            NodeKind::Action(act) => act(agent, dt),
            NodeKind::Wait { duration } => {
                let timer = &mut state.timers[id.index()];
                *timer += dt;
                if *timer >= *duration {
                    *timer = 0.0;
                    Status::Success
                } else {
                    Status::Running
                }
            }
        };
        state.statuses[id.index()] = status;
        status
    }
}

impl<A> fmt::Debug for BehaviorTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.nodes.first().map(|n| &n.name))
            .finish()
    }
}

// ── TreeState ─────────────────────────────────────────────────────────────────

/// Per-agent mutable state for one [`BehaviorTree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    statuses: Vec<Status>,
    timers:   Vec<f64>,
}

impl TreeState {
    pub fn new<A>(tree: &BehaviorTree<A>) -> Self {
        Self {
            statuses: vec![Status::Idle; tree.len()],
            timers:   vec![0.0; tree.len()],
        }
    }

    /// Every status back to `Idle` and every wait timer back to zero.
    pub fn reset(&mut self) {
        self.statuses.fill(Status::Idle);
        self.timers.fill(0.0);
    }

    pub fn status(&self, id: NodeId) -> Status {
        self.statuses.get(id.index()).copied().unwrap_or_default()
    }

    /// Elapsed time of a `Wait` node (zero for other kinds).
    pub fn timer(&self, id: NodeId) -> f64 {
        self.timers.get(id.index()).copied().unwrap_or(0.0)
    }

    fn fit(&mut self, len: usize) {
        if self.statuses.len() < len {
            self.statuses.resize(len, Status::Idle);
            self.timers.resize(len, 0.0);
        }
    }
}

// ── TreeInstance ──────────────────────────────────────────────────────────────

/// A shared tree paired with one agent's state.
pub struct TreeInstance<A> {
    tree:  Arc<BehaviorTree<A>>,
    state: TreeState,
}

impl<A> TreeInstance<A> {
    pub fn new(tree: Arc<BehaviorTree<A>>) -> Self {
        let state = TreeState::new(&tree);
        Self { tree, state }
    }

    pub fn execute(&mut self, agent: &mut A, dt: f64) -> Status {
        self.tree.execute(agent, dt, &mut self.state)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Status of the root after the last execution.
    pub fn status(&self) -> Status {
        self.state.status(self.tree.root())
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn tree(&self) -> &Arc<BehaviorTree<A>> {
        &self.tree
    }
}

impl<A> Clone for TreeInstance<A> {
    fn clone(&self) -> Self {
        Self { tree: Arc::clone(&self.tree), state: self.state.clone() }
    }
}

impl<A> fmt::Debug for TreeInstance<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeInstance")
            .field("tree", &self.tree)
            .field("status", &self.status())
            .finish()
    }
}
