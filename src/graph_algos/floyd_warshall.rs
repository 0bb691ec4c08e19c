use std::fmt::Debug;
use tracing::debug;

use crate::collections::FxIndexSet;
use crate::cost::CostModel;
use crate::errors::{PathError, Result};
use crate::graph::{Direction, Graph};


/// Dense cost and via-node matrices, row-major
#[derive(Debug)]
struct Matrix<C> {
    size: usize,
    costs: Vec<C>,
    via: Vec<Option<usize>>, // intermediate node of the best known i -> j path
}

impl<C> Matrix<C> {
    fn slot(&self, i: usize, j: usize) -> usize {
        i * self.size + j
    }
}


/// All-pairs shortest paths over a fixed set of nodes and relationships
/// https://en.wikipedia.org/wiki/Floyd%E2%80%93Warshall_algorithm
///
/// Nothing is traversed: only the given relationships between the given nodes
/// are considered. O(V^3) time and O(V^2) memory, so meant for small node sets.
/// `infinity` marks unreachable pairs and must compare greater than any real cost.
pub struct FloydWarshall<'a, G: Graph, C> {
    graph: &'a G,
    model: CostModel<'a, G, C>,
    infinity: C,
    direction: Direction,
    nodes: FxIndexSet<G::Node>,
    relationships: Vec<G::Relationship>,
    matrix: Option<Matrix<C>>,
}

impl<'a, G: Graph, C: Clone + Debug> FloydWarshall<'a, G, C> {

    /// `direction` must be `Outgoing` or `Incoming`
    /// Fails when a relationship has an endpoint outside `nodes`
    pub fn new(
        graph: &'a G,
        model: CostModel<'a, G, C>,
        infinity: C,
        direction: Direction,
        nodes: impl IntoIterator<Item = G::Node>,
        relationships: impl IntoIterator<Item = G::Relationship>,
    ) -> Result<Self> {
        if direction == Direction::Both {
            return Err(PathError::UnsupportedDirection(direction));
        }

        let nodes: FxIndexSet<G::Node> = nodes.into_iter().collect();
        let relationships: Vec<G::Relationship> = relationships.into_iter().collect();
        for &relationship in &relationships {
            let (start, end) = graph.endpoints(relationship);
            if let Some(outside) = [start, end].into_iter().find(|node| !nodes.contains(node)) {
                return Err(PathError::UnknownNode(format!("{outside:?}")));
            }
        }

        Ok(Self {
            graph,
            model,
            infinity,
            direction,
            nodes,
            relationships,
            matrix: None,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Drop the computed matrices
    pub fn reset(&mut self) {
        self.matrix = None;
    }

    /// Build the matrices if they have not been built yet
    #[tracing::instrument(skip(self), fields(nodes = self.nodes.len(), relationships = self.relationships.len()))]
    pub fn calculate(&mut self) -> Result<()> {
        if self.matrix.is_none() {
            self.matrix = Some(self.build()?);
        }
        Ok(())
    }

    fn build(&self) -> Result<Matrix<C>> {
        let size = self.nodes.len();
        let model = &self.model;
        let mut matrix = Matrix {
            size,
            costs: vec![self.infinity.clone(); size * size],
            via: vec![None; size * size],
        };
        for i in 0..size {
            let slot = matrix.slot(i, i);
            matrix.costs[slot] = model.zero().clone();
        }

        // Direct relationships, the cheapest one wins for each ordered pair
        for &relationship in &self.relationships {
            let (start, end) = self.graph.endpoints(relationship);
            let (from, to) = match self.direction {
                Direction::Incoming => (end, start),
                _ => (start, end),
            };
            let (Some(i), Some(j)) = (self.nodes.get_index_of(&from), self.nodes.get_index_of(&to)) else {
                continue;
            };
            if i == j {
                continue;
            }
            let cost = model.evaluate(self.graph, relationship, self.direction)?;
            let slot = matrix.slot(i, j);
            if model.is_less(&cost, &matrix.costs[slot]) {
                matrix.costs[slot] = cost;
            }
        }

        for k in 0..size {
            for i in 0..size {
                let through = matrix.costs[matrix.slot(i, k)].clone();
                if self.is_infinite(&through) {
                    continue;
                }
                for j in 0..size {
                    let onward = &matrix.costs[matrix.slot(k, j)];
                    if self.is_infinite(onward) {
                        continue;
                    }
                    let candidate = model.add(&through, onward);
                    let slot = matrix.slot(i, j);
                    if model.is_less(&candidate, &matrix.costs[slot]) {
                        matrix.costs[slot] = candidate;
                        matrix.via[slot] = Some(k);
                    }
                }
            }
        }

        debug!(size, "all pairs costs calculated");
        Ok(matrix)
    }

    fn is_infinite(&self, cost: &C) -> bool {
        self.model.is_equal(cost, &self.infinity)
    }

    fn index_of(&self, node: G::Node) -> Result<usize> {
        self.nodes
            .get_index_of(&node)
            .ok_or_else(|| PathError::UnknownNode(format!("{node:?}")))
    }

    /// Cost from `start` to `target`, `infinity` when unreachable
    pub fn cost(&mut self, start: G::Node, target: G::Node) -> Result<C> {
        self.calculate()?;
        let (i, j) = (self.index_of(start)?, self.index_of(target)?);
        Ok(self
            .matrix
            .as_ref()
            .map(|matrix| matrix.costs[matrix.slot(i, j)].clone())
            .unwrap_or_else(|| self.infinity.clone()))
    }

    /// Nodes of a shortest path from `start` to `target`
    /// A single node when they are equal, empty when unreachable
    pub fn path(&mut self, start: G::Node, target: G::Node) -> Result<Vec<G::Node>> {
        self.calculate()?;
        let (i, j) = (self.index_of(start)?, self.index_of(target)?);
        if i == j {
            return Ok(vec![start]);
        }
        let Some(matrix) = &self.matrix else {
            return Ok(Vec::new());
        };
        if self.is_infinite(&matrix.costs[matrix.slot(i, j)]) {
            return Ok(Vec::new());
        }

        let mut indices = vec![i];
        expand_via(matrix, i, j, &mut indices);
        Ok(indices
            .into_iter()
            .filter_map(|index| self.nodes.get_index(index).copied())
            .collect())
    }
}

/// Append the indices after `i` on the path i -> j
/// path(i, j) = path(i, via) ++ path(via, j), or the direct hop when no via is recorded
fn expand_via<C>(matrix: &Matrix<C>, i: usize, j: usize, indices: &mut Vec<usize>) {
    match matrix.via[matrix.slot(i, j)] {
        Some(k) => {
            expand_via(matrix, i, k, indices);
            expand_via(matrix, k, j, indices);
        }
        None => indices.push(j),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{Adder, NaturalOrder, PropertyEvaluator};
    use crate::graph::SimpleGraph;

    fn floyd_warshall(graph: &SimpleGraph, direction: Direction) -> FloydWarshall<'_, SimpleGraph, f64> {
        FloydWarshall::new(
            graph,
            CostModel::new(0.0, PropertyEvaluator::new("cost"), Adder, NaturalOrder),
            f64::INFINITY,
            direction,
            graph.nodes(),
            graph.all_relationships(),
        )
        .unwrap()
    }

    fn chain() -> SimpleGraph {
        let mut graph = SimpleGraph::new();
        graph.connect_with_cost("a", "b", "LINK", "cost", 1.0);
        graph.connect_with_cost("b", "c", "LINK", "cost", 2.0);
        graph.connect_with_cost("a", "c", "LINK", "cost", 4.0);
        graph.connect_with_cost("c", "d", "LINK", "cost", 1.0);
        graph
    }

    #[test]
    fn test_costs_and_paths_outgoing() {
        let graph = chain();
        let node = |name| graph.node(name).unwrap();
        let mut fw = floyd_warshall(&graph, Direction::Outgoing);

        assert_eq!(fw.cost(node("a"), node("c")).unwrap(), 3.0);
        assert_eq!(fw.cost(node("a"), node("d")).unwrap(), 4.0);
        assert_eq!(fw.cost(node("d"), node("a")).unwrap(), f64::INFINITY);
        assert_eq!(fw.cost(node("b"), node("b")).unwrap(), 0.0);

        let path = fw.path(node("a"), node("d")).unwrap();
        assert_eq!(path, vec![node("a"), node("b"), node("c"), node("d")]);
        assert_eq!(fw.path(node("c"), node("c")).unwrap(), vec![node("c")]);
        assert!(fw.path(node("d"), node("a")).unwrap().is_empty());
    }

    #[test]
    fn test_incoming_reverses_relationships() {
        let graph = chain();
        let node = |name| graph.node(name).unwrap();
        let mut fw = floyd_warshall(&graph, Direction::Incoming);

        assert_eq!(fw.cost(node("d"), node("a")).unwrap(), 4.0);
        assert_eq!(fw.cost(node("a"), node("d")).unwrap(), f64::INFINITY);
        assert_eq!(fw.path(node("c"), node("a")).unwrap(), vec![node("c"), node("b"), node("a")]);
    }

    #[test]
    fn test_parallel_relationships_keep_cheapest() {
        let mut graph = SimpleGraph::new();
        graph.connect_with_cost("a", "b", "LINK", "cost", 5.0);
        graph.connect_with_cost("a", "b", "LINK", "cost", 2.0);
        graph.connect_with_cost("a", "b", "LINK", "cost", 7.0);
        let node = |name| graph.node(name).unwrap();

        let mut fw = floyd_warshall(&graph, Direction::Outgoing);
        assert_eq!(fw.cost(node("a"), node("b")).unwrap(), 2.0);
    }

    #[test]
    fn test_saturating_infinity_does_not_overflow() {
        let graph = chain();
        let node = |name| graph.node(name).unwrap();
        let mut fw: FloydWarshall<'_, SimpleGraph, i64> = FloydWarshall::new(
            &graph,
            CostModel::numeric("cost"),
            i64::MAX,
            Direction::Outgoing,
            graph.nodes(),
            graph.all_relationships(),
        )
        .unwrap();

        assert_eq!(fw.cost(node("a"), node("d")).unwrap(), 4);
        assert_eq!(fw.cost(node("d"), node("b")).unwrap(), i64::MAX);
    }

    #[test]
    fn test_both_direction_rejected() {
        let graph = chain();
        let result = FloydWarshall::new(
            &graph,
            CostModel::<SimpleGraph, f64>::numeric("cost"),
            f64::INFINITY,
            Direction::Both,
            graph.nodes(),
            graph.all_relationships(),
        );

        assert!(matches!(result, Err(PathError::UnsupportedDirection(Direction::Both))));
    }

    #[test]
    fn test_nodes_outside_the_set_rejected() {
        let graph = chain();
        let node = |name| graph.node(name).unwrap();

        // Relationship c -> d leaves the node set
        let subset = FloydWarshall::new(
            &graph,
            CostModel::<SimpleGraph, f64>::numeric("cost"),
            f64::INFINITY,
            Direction::Outgoing,
            [node("a"), node("b"), node("c")],
            graph.all_relationships(),
        );
        assert!(matches!(subset, Err(PathError::UnknownNode(_))));

        // Query for a node the calculation does not know
        let mut fw = FloydWarshall::new(
            &graph,
            CostModel::<SimpleGraph, f64>::numeric("cost"),
            f64::INFINITY,
            Direction::Outgoing,
            [node("a"), node("b")],
            graph.relationship("a", "b"),
        )
        .unwrap();
        assert_eq!(fw.cost(node("a"), node("b")).unwrap(), 1.0);
        assert!(matches!(fw.cost(node("a"), node("d")), Err(PathError::UnknownNode(_))));
    }
}
