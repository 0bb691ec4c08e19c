use std::{cmp::Ordering, fmt::Debug};
use tracing::debug;

use crate::collections::FxIndexSet;
use crate::cost::CostModel;
use crate::errors::{PathError, Result};
use crate::graph::{Direction, Graph, RelationshipType};
use crate::path::Path;
use super::frontier::Frontier;
use super::limits::{TraversalBudget, TraversalLimits, TraversalStats};
use super::shortest_path::{all_shortest_paths, first_shortest_path};


/// Check every requested relationship type exists before any traversal starts
pub(crate) fn validate_types<G: Graph>(graph: &G, types: &[RelationshipType]) -> Result<()> {
    match types.iter().find(|relationship_type| !graph.has_relationship_type(relationship_type)) {
        Some(unknown) => Err(PathError::UnknownRelationshipType(unknown.name().to_string())),
        None => Ok(()),
    }
}


/// Bidirectional Dijkstra between two nodes, finding every path of minimal cost
/// https://en.wikipedia.org/wiki/Bidirectional_search
///
/// One frontier grows from the start node, the other from the end node against
/// the search direction. They alternate one expansion each until no further
/// expansion can produce a cheaper or equally cheap meeting point.
///
/// The cost evaluator is called once per relaxed relationship, with the
/// direction the relationship is traversed in when reading the path from start
/// to end. The result is calculated once and cached until the start node, end
/// node or limits change.
pub struct Dijkstra<'a, G: Graph, C> {
    graph: &'a G,
    start: G::Node,
    end: G::Node,
    model: CostModel<'a, G, C>,
    direction: Direction,
    types: Vec<RelationshipType>,
    limits: TraversalLimits<C>,
    outcome: Option<Outcome<G, C>>,
}

/// Finished search: both frontiers and the nodes where the cheapest paths meet
struct Outcome<G: Graph, C> {
    cost: Option<C>,
    meeting: Vec<G::Node>,
    forward: Frontier<G, C>,
    backward: Frontier<G, C>,
    stats: TraversalStats,
}

impl<'a, G: Graph, C: Clone + Debug> Dijkstra<'a, G, C> {

    /// Fails when a relationship type is unknown to the graph
    pub fn new(
        graph: &'a G,
        start: G::Node,
        end: G::Node,
        model: CostModel<'a, G, C>,
        direction: Direction,
        types: &[RelationshipType],
    ) -> Result<Self> {
        validate_types(graph, types)?;
        Ok(Self {
            graph,
            start,
            end,
            model,
            direction,
            types: types.to_vec(),
            limits: TraversalLimits::default(),
            outcome: None,
        })
    }

    pub fn with_limits(mut self, limits: TraversalLimits<C>) -> Self {
        self.limits = limits;
        self.reset();
        self
    }

    /// Cap the number of finalized nodes, summed over both frontiers
    pub fn limit_max_nodes_to_traverse(&mut self, max_nodes: u64) {
        self.limits.max_nodes = Some(max_nodes);
        self.reset();
    }

    /// Cap the number of relaxed relationships, summed over both frontiers
    pub fn limit_max_relationships_to_traverse(&mut self, max_relationships: u64) {
        self.limits.max_relationships = Some(max_relationships);
        self.reset();
    }

    /// Paths costing more than `max_cost` are not reported
    pub fn limit_max_cost_to_traverse(&mut self, max_cost: C) {
        self.limits.max_cost = Some(max_cost);
        self.reset();
    }

    pub fn set_start_node(&mut self, start: G::Node) {
        self.start = start;
        self.reset();
    }

    pub fn set_end_node(&mut self, end: G::Node) {
        self.end = end;
        self.reset();
    }

    /// Drop the cached result so the next query searches again
    pub fn reset(&mut self) {
        self.outcome = None;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn relationship_types(&self) -> &[RelationshipType] {
        &self.types
    }

    /// Run the search if it has not run yet
    /// Returns true if a path was found
    pub fn calculate(&mut self) -> Result<bool> {
        if self.outcome.is_none() {
            self.outcome = Some(self.search()?);
        }
        Ok(self.outcome.as_ref().is_some_and(|outcome| outcome.cost.is_some()))
    }

    /// Cost of the shortest path(s), `None` when no path was found
    pub fn cost(&mut self) -> Result<Option<C>> {
        self.calculate()?;
        Ok(self.outcome.as_ref().and_then(|outcome| outcome.cost.clone()))
    }

    /// Every path of minimal cost, empty when no path was found
    pub fn paths(&mut self) -> Result<Vec<Path<G::Node, G::Relationship>>> {
        self.calculate()?;
        Ok(self.outcome.as_ref().map(Outcome::all_paths).unwrap_or_default())
    }

    /// Distinct node sequences of the minimal paths
    /// Paths differing only by parallel relationships collapse into one
    pub fn paths_as_nodes(&mut self) -> Result<Vec<Vec<G::Node>>> {
        let nodes: FxIndexSet<Vec<G::Node>> = self.paths()?.iter().map(|path| path.nodes().to_vec()).collect();
        Ok(nodes.into_iter().collect())
    }

    pub fn paths_as_relationships(&mut self) -> Result<Vec<Vec<G::Relationship>>> {
        let relationships: FxIndexSet<Vec<G::Relationship>> =
            self.paths()?.iter().map(|path| path.relationships().to_vec()).collect();
        Ok(relationships.into_iter().collect())
    }

    /// One of the paths of minimal cost
    pub fn path(&mut self) -> Result<Option<Path<G::Node, G::Relationship>>> {
        self.calculate()?;
        Ok(self.outcome.as_ref().and_then(Outcome::first_path))
    }

    pub fn path_as_nodes(&mut self) -> Result<Option<Vec<G::Node>>> {
        Ok(self.path()?.map(|path| path.nodes().to_vec()))
    }

    pub fn path_as_relationships(&mut self) -> Result<Option<Vec<G::Relationship>>> {
        Ok(self.path()?.map(|path| path.relationships().to_vec()))
    }

    /// Counters of the last search, zero before the first one
    pub fn stats(&self) -> TraversalStats {
        self.outcome.as_ref().map(|outcome| outcome.stats).unwrap_or_default()
    }

    #[tracing::instrument(skip(self), fields(start = ?self.start, end = ?self.end, direction = ?self.direction))]
    fn search(&self) -> Result<Outcome<G, C>> {
        let model = &self.model;
        let budget = TraversalBudget::new(&self.limits);
        let mut forward = Frontier::new(self.direction, false);
        let mut backward = Frontier::new(self.direction, true);
        forward.seed(self.start, model.zero().clone(), model);
        backward.seed(self.end, model.zero().clone(), model);

        // Special case when path length is zero
        if self.start == self.end {
            return Ok(Outcome {
                cost: Some(model.add(model.zero(), model.zero())),
                meeting: vec![self.start],
                forward,
                backward,
                stats: budget.stats(),
            });
        }

        let mut best: Option<C> = None;
        let mut forward_turn = true;
        while !self.should_stop(&forward, &backward, best.as_ref(), &budget) {
            let (side, other) = if forward_turn {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };
            forward_turn = !forward_turn;

            let Some(node) = side.expand(self.graph, model, &self.types, &budget)? else {
                continue;
            };

            // Found a path? Keep it if it beats the best so far
            if let (Some(here), Some(there)) = (side.distance(node), other.seen(node)) {
                let total = model.add(here, there);
                if best.as_ref().is_none_or(|best| model.is_less(&total, best)) {
                    debug!(node = ?node, cost = ?total, "found cheaper meeting node");
                    best = Some(total);
                }
            }
        }

        let cost = best.filter(|cost| {
            self.limits.max_cost.as_ref().is_none_or(|max_cost| !model.is_less(max_cost, cost))
        });
        let meeting = match &cost {
            Some(cost) => meeting_nodes(model, &forward, &backward, cost),
            None => Vec::new(),
        };
        let stats = budget.stats();
        debug!(
            cost = ?cost,
            meeting_nodes = meeting.len(),
            nodes_traversed = stats.nodes_traversed,
            relationships_traversed = stats.relationships_traversed,
            "bidirectional search finished"
        );

        Ok(Outcome { cost, meeting, forward, backward, stats })
    }

    /// Stop once a frontier or the budget runs out, or once the cheapest
    /// continuation on both sides costs strictly more than the best meeting
    /// Ties keep the search going so every equal-cost path is found.
    fn should_stop(
        &self,
        forward: &Frontier<G, C>,
        backward: &Frontier<G, C>,
        best: Option<&C>,
        budget: &TraversalBudget,
    ) -> bool {
        if !forward.has_next(budget) || !backward.has_next(budget) {
            if budget.exhausted() {
                debug!(stats = ?budget.stats(), "traversal limit reached");
            }
            return true;
        }

        let (Some(next_forward), Some(next_backward)) = (forward.peek_cost(), backward.peek_cost()) else {
            return true;
        };
        let horizon = self.model.add(next_forward, next_backward);

        if best.is_some_and(|best| self.model.compare(&horizon, best) == Ordering::Greater) {
            return true;
        }
        if let Some(max_cost) = &self.limits.max_cost {
            if self.model.compare(&horizon, max_cost) == Ordering::Greater {
                debug!(max_cost = ?max_cost, "cost limit reached");
                return true;
            }
        }
        false
    }
}

/// Every node reached from both sides whose summed cost equals `cost`
/// Tentative costs are included: their predecessors are all finalized, so each
/// reconstructed path really costs `cost`.
fn meeting_nodes<G: Graph, C: Clone>(
    model: &CostModel<'_, G, C>,
    forward: &Frontier<G, C>,
    backward: &Frontier<G, C>,
    cost: &C,
) -> Vec<G::Node> {
    forward
        .visits()
        .filter_map(|(node, visit)| {
            let other = backward.seen(node)?;
            model.is_equal(&model.add(&visit.seen, other), cost).then_some(node)
        })
        .collect()
}

impl<G: Graph, C> Outcome<G, C> {

    /// Forward paths to each meeting node combined with every backward path
    /// from it, duplicates across meeting nodes removed
    fn all_paths(&self) -> Vec<Path<G::Node, G::Relationship>> {
        let mut paths: FxIndexSet<Path<G::Node, G::Relationship>> = FxIndexSet::default();
        for &middle in &self.meeting {
            let heads = all_shortest_paths(&self.forward, middle);
            let tails: Vec<_> = all_shortest_paths(&self.backward, middle)
                .iter()
                .map(Path::reversed)
                .collect();
            // For all combinations...
            for head in &heads {
                for tail in &tails {
                    if let Some(path) = head.join(tail).filter(is_simple) {
                        paths.insert(path);
                    }
                }
            }
        }
        paths.into_iter().collect()
    }

    fn first_path(&self) -> Option<Path<G::Node, G::Relationship>> {
        self.meeting.iter().find_map(|&middle| {
            let head = first_shortest_path(&self.forward, middle)?;
            let tail = first_shortest_path(&self.backward, middle)?.reversed();
            head.join(&tail).filter(is_simple)
        })
    }
}

/// No node appears twice
fn is_simple<N: Copy + PartialEq, R: Copy>(path: &Path<N, R>) -> bool {
    let nodes = path.nodes();
    nodes.iter().enumerate().all(|(i, node)| !nodes[..i].contains(node))
}
