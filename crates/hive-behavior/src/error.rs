use hive_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior tree node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("behavior tree node {0} is a leaf and cannot have children")]
    LeafNode(NodeId),

    #[error("GOAP action {name:?} has invalid cost {cost}")]
    InvalidCost { name: String, cost: f64 },

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
