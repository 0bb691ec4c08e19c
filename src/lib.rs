//! Shortest path algorithms over typed property graphs
//!
//! The algorithms are generic over the graph (see [`graph::Graph`]) and over
//! the cost domain (see [`cost::CostModel`]): costs can be any type with an
//! accumulator and a total order, not only numbers.
//!
//! - [`Dijkstra`]: bidirectional search returning every path of minimal cost
//! - [`FloydWarshall`]: all pairs over a fixed node and relationship set
//! - [`SingleSourceDijkstra`] and [`SingleSourceBfs`]: one-to-all queries

mod collections;
pub mod cost;
pub mod errors;
pub mod graph;
pub mod graph_algos;
pub mod path;

pub use cost::{Adder, ConstantEvaluator, CostModel, NaturalOrder, PropertyEvaluator};
pub use errors::{PathError, Result};
pub use graph::{Direction, Graph, PropertyValue, RelationshipType, SimpleGraph};
pub use graph_algos::{
    Dijkstra, FloydWarshall, SingleSourceBfs, SingleSourceDijkstra, SingleSourceShortestPath,
    TraversalLimits, TraversalStats,
};
pub use path::{Path, PathElement};
