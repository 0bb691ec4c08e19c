use std::{cmp::Ordering, fmt::Debug};
use indexmap::map::Entry::{Occupied, Vacant};
use tracing::debug;

use crate::collections::FxIndexMap;
use crate::cost::CostModel;
use crate::errors::Result;
use crate::graph::{Direction, Graph, RelationshipType};
use crate::path::Path;
use super::dijkstra::validate_types;
use super::frontier::Frontier;
use super::limits::{TraversalBudget, TraversalLimits, TraversalStats};
use super::shortest_path::{all_shortest_paths, first_shortest_path, PredecessorArena};


/// One-to-all shortest path queries from a fixed start node
/// Queries run the underlying search on demand and reuse it until `reset`.
pub trait SingleSourceShortestPath<G: Graph> {
    type Cost;

    /// Change the start node, dropping any cached search
    fn set_start_node(&mut self, start: G::Node);

    fn reset(&mut self);

    /// Cost of reaching `target`, `None` when it cannot be reached
    fn cost(&mut self, target: G::Node) -> Result<Option<Self::Cost>>;

    /// Every path to `target` of minimal cost
    fn paths(&mut self, target: G::Node) -> Result<Vec<Path<G::Node, G::Relationship>>>;

    /// One path to `target` of minimal cost
    fn path(&mut self, target: G::Node) -> Result<Option<Path<G::Node, G::Relationship>>>;

    /// Nodes immediately before `target` on some path of minimal cost
    fn predecessor_nodes(&mut self, target: G::Node) -> Result<Vec<G::Node>>;

    fn direction(&self) -> Direction;

    fn relationship_types(&self) -> &[RelationshipType];

    fn path_as_nodes(&mut self, target: G::Node) -> Result<Option<Vec<G::Node>>> {
        Ok(self.path(target)?.map(|path| path.nodes().to_vec()))
    }

    fn path_as_relationships(&mut self, target: G::Node) -> Result<Option<Vec<G::Relationship>>> {
        Ok(self.path(target)?.map(|path| path.relationships().to_vec()))
    }
}

/// Distinct nodes before `target` in the arena's predecessor lists
fn predecessors_of<A: PredecessorArena>(arena: &A, target: A::Node) -> Vec<A::Node> {
    let Some(index) = arena.index_of(target) else {
        return Vec::new();
    };
    let mut nodes = Vec::new();
    for &(_, predecessor) in arena.predecessors_at(index) {
        if let Some(node) = arena.node_at(predecessor) {
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
    }
    nodes
}


/// Dijkstra from one start node, expanded only as far as the queries need
pub struct SingleSourceDijkstra<'a, G: Graph, C> {
    graph: &'a G,
    start: G::Node,
    model: CostModel<'a, G, C>,
    direction: Direction,
    types: Vec<RelationshipType>,
    limits: TraversalLimits<C>,
    search: Option<Search<G, C>>,
}

/// Frontier kept between queries together with the budget it has used
struct Search<G: Graph, C> {
    frontier: Frontier<G, C>,
    budget: TraversalBudget,
}

impl<'a, G: Graph, C: Clone + Debug> SingleSourceDijkstra<'a, G, C> {

    /// Fails when a relationship type is unknown to the graph
    pub fn new(
        graph: &'a G,
        start: G::Node,
        model: CostModel<'a, G, C>,
        direction: Direction,
        types: &[RelationshipType],
    ) -> Result<Self> {
        validate_types(graph, types)?;
        Ok(Self {
            graph,
            start,
            model,
            direction,
            types: types.to_vec(),
            limits: TraversalLimits::default(),
            search: None,
        })
    }

    pub fn with_limits(mut self, limits: TraversalLimits<C>) -> Self {
        self.limits = limits;
        self.search = None;
        self
    }

    /// Counters of the search so far
    pub fn stats(&self) -> TraversalStats {
        self.search.as_ref().map(|search| search.budget.stats()).unwrap_or_default()
    }

    /// Expand until `target` and every node tying with it are finalized,
    /// or until the frontier, the budget or the cost ceiling runs out
    #[tracing::instrument(skip(self), fields(start = ?self.start))]
    fn settle(&mut self, target: G::Node) -> Result<()> {
        let model = &self.model;
        let search = self.search.get_or_insert_with(|| {
            let mut frontier = Frontier::new(self.direction, false);
            frontier.seed(self.start, model.zero().clone(), model);
            Search { frontier, budget: TraversalBudget::new(&self.limits) }
        });

        loop {
            let Some(next) = search.frontier.peek_cost() else {
                break;
            };
            if let Some(distance) = search.frontier.distance(target) {
                if model.compare(next, distance) == Ordering::Greater {
                    break;
                }
            }
            if let Some(max_cost) = &self.limits.max_cost {
                if model.is_less(max_cost, next) {
                    debug!(max_cost = ?max_cost, "cost limit reached");
                    break;
                }
            }
            match search.frontier.expand(self.graph, model, &self.types, &search.budget) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    debug!(stats = ?search.budget.stats(), "search exhausted");
                    break;
                }
                Err(error) => {
                    // A half relaxed frontier must not answer later queries
                    self.search = None;
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    /// The settled frontier, if `target` was finalized within the cost ceiling
    fn reached(&mut self, target: G::Node) -> Result<Option<&Frontier<G, C>>> {
        self.settle(target)?;
        let model = &self.model;
        let max_cost = self.limits.max_cost.as_ref();
        Ok(self.search.as_ref().map(|search| &search.frontier).filter(|frontier| {
            frontier.distance(target).is_some_and(|distance| {
                max_cost.is_none_or(|max_cost| !model.is_less(max_cost, distance))
            })
        }))
    }
}

impl<'a, G: Graph, C: Clone + Debug> SingleSourceShortestPath<G> for SingleSourceDijkstra<'a, G, C> {
    type Cost = C;

    fn set_start_node(&mut self, start: G::Node) {
        self.start = start;
        self.reset();
    }

    fn reset(&mut self) {
        self.search = None;
    }

    fn cost(&mut self, target: G::Node) -> Result<Option<C>> {
        Ok(self.reached(target)?.and_then(|frontier| frontier.distance(target).cloned()))
    }

    fn paths(&mut self, target: G::Node) -> Result<Vec<Path<G::Node, G::Relationship>>> {
        Ok(self.reached(target)?.map(|frontier| all_shortest_paths(frontier, target)).unwrap_or_default())
    }

    fn path(&mut self, target: G::Node) -> Result<Option<Path<G::Node, G::Relationship>>> {
        Ok(self.reached(target)?.and_then(|frontier| first_shortest_path(frontier, target)))
    }

    fn predecessor_nodes(&mut self, target: G::Node) -> Result<Vec<G::Node>> {
        Ok(self.reached(target)?.map(|frontier| predecessors_of(frontier, target)).unwrap_or_default())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn relationship_types(&self) -> &[RelationshipType] {
        &self.types
    }
}


/// Node reached by the breadth-first search
#[derive(Debug)]
struct Reached<R> {
    depth: usize,
    predecessors: Vec<(R, usize)>, // every (relationship, arena index) one layer up
}

/// Nodes in the order they were discovered, the start node first
struct Layers<G: Graph> {
    arena: FxIndexMap<G::Node, Reached<G::Relationship>>,
    stats: TraversalStats,
}

impl<G: Graph> PredecessorArena for Layers<G> {
    type Node = G::Node;
    type Relationship = G::Relationship;

    fn index_of(&self, node: G::Node) -> Option<usize> {
        self.arena.get_index_of(&node)
    }

    fn node_at(&self, index: usize) -> Option<G::Node> {
        self.arena.get_index(index).map(|(&node, _)| node)
    }

    fn predecessors_at(&self, index: usize) -> &[(G::Relationship, usize)] {
        self.arena
            .get_index(index)
            .map(|(_, reached)| reached.predecessors.as_slice())
            .unwrap_or_default()
    }

    fn is_seed(&self, index: usize) -> bool {
        index == 0
    }
}


/// Breadth-first single source search, every relationship costs one hop
/// https://en.wikipedia.org/wiki/Breadth-first_search
///
/// The whole reachable graph is explored on the first query, layer by layer.
/// `max_cost` in the limits caps the depth. When the node or relationship
/// budget cuts a layer short, the nodes it had started to discover are
/// dropped, so every reported node carries all of its equal-depth paths.
pub struct SingleSourceBfs<'a, G: Graph> {
    graph: &'a G,
    start: G::Node,
    direction: Direction,
    types: Vec<RelationshipType>,
    limits: TraversalLimits<usize>,
    layers: Option<Layers<G>>,
}

impl<'a, G: Graph> SingleSourceBfs<'a, G> {

    /// Fails when a relationship type is unknown to the graph
    pub fn new(graph: &'a G, start: G::Node, direction: Direction, types: &[RelationshipType]) -> Result<Self> {
        validate_types(graph, types)?;
        Ok(Self {
            graph,
            start,
            direction,
            types: types.to_vec(),
            limits: TraversalLimits::default(),
            layers: None,
        })
    }

    pub fn with_limits(mut self, limits: TraversalLimits<usize>) -> Self {
        self.limits = limits;
        self.layers = None;
        self
    }

    pub fn stats(&self) -> TraversalStats {
        self.layers.as_ref().map(|layers| layers.stats).unwrap_or_default()
    }

    fn layers(&mut self) -> &Layers<G> {
        let layers = match self.layers.take() {
            Some(layers) => layers,
            None => self.explore(),
        };
        self.layers.insert(layers)
    }

    #[tracing::instrument(skip(self), fields(start = ?self.start, direction = ?self.direction))]
    fn explore(&self) -> Layers<G> {
        let budget = TraversalBudget::new(&self.limits);
        let mut arena: FxIndexMap<G::Node, Reached<G::Relationship>> = FxIndexMap::default();
        arena.insert(self.start, Reached { depth: 0, predecessors: Vec::new() });

        let mut current = vec![0];
        let mut depth = 0;
        'layers: while !current.is_empty() && self.limits.max_cost.is_none_or(|max_depth| depth < max_depth) {
            depth += 1;
            let layer_start = arena.len();
            let mut next = Vec::new();

            for index in current {
                if budget.exhausted() {
                    // Unexpanded nodes above may still lead into this layer
                    debug!(stats = ?budget.stats(), "traversal limit reached");
                    arena.truncate(layer_start);
                    break 'layers;
                }
                let Some((&node, _)) = arena.get_index(index) else {
                    continue;
                };
                budget.count_node();

                for relationship in self.graph.relationships(node, self.direction, &self.types) {
                    if budget.relationships_exhausted() {
                        debug!(stats = ?budget.stats(), "traversal limit reached");
                        arena.truncate(layer_start);
                        break 'layers;
                    }
                    budget.count_relationship();

                    let target = self.graph.other_node(relationship, node);
                    match arena.entry(target) {
                        Vacant(e) => {
                            next.push(e.index());
                            e.insert(Reached { depth, predecessors: vec![(relationship, index)] });
                        }
                        Occupied(mut e) => {
                            // Only same-layer ties are shortest paths
                            let reached = e.get_mut();
                            if reached.depth == depth && !reached.predecessors.contains(&(relationship, index)) {
                                reached.predecessors.push((relationship, index));
                            }
                        }
                    }
                }
            }
            current = next;
        }

        debug!(reached = arena.len(), depth, "breadth first search finished");
        Layers { arena, stats: budget.stats() }
    }
}

impl<'a, G: Graph> SingleSourceShortestPath<G> for SingleSourceBfs<'a, G> {
    type Cost = usize;

    fn set_start_node(&mut self, start: G::Node) {
        self.start = start;
        self.reset();
    }

    fn reset(&mut self) {
        self.layers = None;
    }

    fn cost(&mut self, target: G::Node) -> Result<Option<usize>> {
        Ok(self.layers().arena.get(&target).map(|reached| reached.depth))
    }

    fn paths(&mut self, target: G::Node) -> Result<Vec<Path<G::Node, G::Relationship>>> {
        Ok(all_shortest_paths(self.layers(), target))
    }

    fn path(&mut self, target: G::Node) -> Result<Option<Path<G::Node, G::Relationship>>> {
        Ok(first_shortest_path(self.layers(), target))
    }

    fn predecessor_nodes(&mut self, target: G::Node) -> Result<Vec<G::Node>> {
        Ok(predecessors_of(self.layers(), target))
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn relationship_types(&self) -> &[RelationshipType] {
        &self.types
    }
}
