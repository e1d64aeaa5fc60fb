//! `hive-behavior`: per-agent decision making.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`status`]  | `Status` - the four-valued result of every decision step          |
//! | [`bt`]      | `BehaviorTree` (shared definition), `TreeState`, `TreeInstance`   |
//! | [`goap`]    | `GoapAgent`, `GoapAction`, `WorldState`, `FactValue`, `GoapConfig` |
//! | [`presets`] | Ready-made enemy tree and enemy GOAP agent                        |
//! | [`error`]   | `BehaviorError`, `BehaviorResult<T>`                              |
//!
//! # Design notes
//!
//! A behavior tree is split into an immutable definition and per-agent
//! mutable state:
//!
//! - [`BehaviorTree<A>`] is an arena of nodes.  Children are owned through
//!   the arena in insertion order; the parent link is a plain [`NodeId`]
//!   used for inspection only.  A definition is built once per agent type
//!   and shared behind an `Arc`.
//! - [`TreeState`] holds each node's last status and each `Wait` node's
//!   timer.  Resetting an agent is `state.reset()`, which is identical to a
//!   freshly built state.
//!
//! GOAP world state is keyed by a caller-chosen type (usually a small enum),
//! with [`FactValue`] as the tagged bool-or-number value.  Planning is a
//! cost-ordered search over world states, bounded by `max_plan_length` and
//! deduplicated on state equality.
//!
//! [`NodeId`]: hive_core::NodeId

pub mod bt;
pub mod error;
pub mod goap;
pub mod presets;
pub mod status;


pub use bt::{BehaviorTree, NodeKind, TreeInstance, TreeState};
pub use error::{BehaviorError, BehaviorResult};
pub use goap::{FactKey, FactValue, GoapAction, GoapAgent, GoapConfig, WorldState};
pub use status::Status;
