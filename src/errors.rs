use thiserror::Error;

use crate::graph::Direction;


/// Errors raised by the shortest path algorithms
/// Disconnected nodes and exhausted traversal limits are not errors,
/// they surface as `None` costs and empty path sets.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("relationship type {0:?} is not known to the graph")]
    UnknownRelationshipType(String), // Configuration names a type the graph does not have

    #[error("node {0} is not part of the calculation")]
    UnknownNode(String), // Node outside a fixed node set

    #[error("direction {0:?} is not supported by this algorithm")]
    UnsupportedDirection(Direction),

    #[error("relationship {0} lowers the cost of an already finalized node (negative cost)")]
    NegativeCost(String),

    #[error("relationship {relationship} has no cost property {key:?}")]
    MissingCostProperty { relationship: String, key: String },

    #[error("cost property {key:?} on relationship {relationship} is not a usable number")]
    InvalidCostProperty { relationship: String, key: String },
}

pub type Result<T> = std::result::Result<T, PathError>;
