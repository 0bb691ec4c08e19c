pub mod dijkstra;
pub mod floyd_warshall;
pub mod limits;
pub mod single_source;
mod frontier;
mod queue;
mod shortest_path;

pub use dijkstra::Dijkstra;
pub use floyd_warshall::FloydWarshall;
pub use limits::{TraversalLimits, TraversalStats};
pub use single_source::{SingleSourceBfs, SingleSourceDijkstra, SingleSourceShortestPath};
