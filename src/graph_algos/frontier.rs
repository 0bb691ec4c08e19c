use std::cmp::Ordering;
use indexmap::map::Entry::{Occupied, Vacant};
use tracing::trace;

use crate::collections::FxIndexMap;
use crate::cost::CostModel;
use crate::errors::{PathError, Result};
use crate::graph::{Direction, Graph, RelationshipType};
use super::limits::TraversalBudget;
use super::queue::CostQueue;
use super::shortest_path::PredecessorArena;


/// State of one node reached by a frontier
/// - seen: best cost known so far, final once `distance` is set
/// - distance: finalized cost, never revised
/// - predecessors: every (relationship, arena index) pair achieving `seen`
#[derive(Debug)]
pub(crate) struct Visit<R, C> {
    pub seen: C,
    pub distance: Option<C>,
    pub predecessors: Vec<(R, usize)>,
    seed: bool,
}


/// One Dijkstra frontier, grown a node at a time
///
/// Nodes live in an insertion-ordered arena, the arena index is the node's
/// handle in the queue and in predecessor lists. A backward frontier walks
/// relationships against the search direction and reports them to the cost
/// evaluator flipped, so costs always read as start -> end.
#[derive(Debug)]
pub(crate) struct Frontier<G: Graph, C> {
    adjacency: Direction, // direction used to list relationships on this side
    backwards: bool,
    arena: FxIndexMap<G::Node, Visit<G::Relationship, C>>,
    queue: CostQueue<C>,
}

impl<G: Graph, C: Clone> Frontier<G, C> {

    /// `direction` is the search direction, a backward frontier reverses it
    pub fn new(direction: Direction, backwards: bool) -> Self {
        Self {
            adjacency: if backwards { direction.reverse() } else { direction },
            backwards,
            arena: FxIndexMap::default(),
            queue: CostQueue::default(),
        }
    }

    /// Start the frontier at `node` with `cost`
    pub fn seed(&mut self, node: G::Node, cost: C, model: &CostModel<'_, G, C>) {
        let index = self.arena.insert_full(node, Visit {
            seen: cost.clone(),
            distance: None,
            predecessors: Vec::new(),
            seed: true,
        }).0;
        self.queue.push_or_decrease(index, cost, model.comparator());
    }

    /// Unfinalized candidates remain and the budget allows another expansion
    pub fn has_next(&self, budget: &TraversalBudget) -> bool {
        !self.queue.is_empty() && !budget.exhausted()
    }

    /// Cost of the node the next expansion would finalize
    pub fn peek_cost(&self) -> Option<&C> {
        self.queue.peek().map(|(_, cost)| cost)
    }

    /// Finalize the cheapest unfinalized node and relax its relationships
    /// Returns `None` once the frontier or the budget is exhausted
    pub fn expand(
        &mut self,
        graph: &G,
        model: &CostModel<'_, G, C>,
        types: &[RelationshipType],
        budget: &TraversalBudget,
    ) -> Result<Option<G::Node>> {
        if budget.exhausted() {
            return Ok(None);
        }
        let Some((index, cost)) = self.queue.pop(model.comparator()) else {
            return Ok(None);
        };
        let Some((&node, visit)) = self.arena.get_index_mut(index) else {
            return Ok(None);
        };
        visit.distance = Some(cost.clone());
        budget.count_node();
        trace!(node = ?node, backwards = self.backwards, "finalized node");

        let relationships: Vec<G::Relationship> = graph.relationships(node, self.adjacency, types).collect();
        for relationship in relationships {
            if budget.relationships_exhausted() {
                break;
            }
            budget.count_relationship();

            let target = graph.other_node(relationship, node);
            if target == node {
                continue;
            }
            let direction = self.logical_direction(graph, relationship, node);
            let edge_cost = model.evaluate(graph, relationship, direction)?;
            let candidate = model.add(&cost, &edge_cost);
            self.relax(index, relationship, target, candidate, model)?;
        }

        Ok(Some(node))
    }

    /// Direction reported to the cost evaluator when leaving `from` over `relationship`
    fn logical_direction(&self, graph: &G, relationship: G::Relationship, from: G::Node) -> Direction {
        let physical = graph.physical_direction(relationship, from);
        if self.backwards { physical.reverse() } else { physical }
    }

    fn relax(
        &mut self,
        from: usize,
        relationship: G::Relationship,
        target: G::Node,
        candidate: C,
        model: &CostModel<'_, G, C>,
    ) -> Result<()> {
        match self.arena.entry(target) {
            Vacant(e) => {
                // This is the first time we're seeing this node
                let index = e.index();
                e.insert(Visit {
                    seen: candidate.clone(),
                    distance: None,
                    predecessors: vec![(relationship, from)],
                    seed: false,
                });
                self.queue.push_or_decrease(index, candidate, model.comparator());
            }
            Occupied(mut e) => {
                let index = e.index();
                let visit = e.get_mut();

                if let Some(distance) = &visit.distance {
                    match model.compare(&candidate, distance) {
                        Ordering::Less => {
                            return Err(PathError::NegativeCost(format!("{relationship:?}")));
                        }
                        // Zero-cost relationships can tie with an already finalized node
                        Ordering::Equal => visit.add_predecessor(relationship, from),
                        Ordering::Greater => {}
                    }
                    return Ok(());
                }

                match model.compare(&candidate, &visit.seen) {
                    Ordering::Less => {
                        visit.seen = candidate.clone();
                        visit.predecessors.clear();
                        visit.predecessors.push((relationship, from));
                        self.queue.push_or_decrease(index, candidate, model.comparator());
                    }
                    Ordering::Equal => visit.add_predecessor(relationship, from),
                    Ordering::Greater => {}
                }
            }
        }
        Ok(())
    }

    /// Tentative or final cost of `node`
    pub fn seen(&self, node: G::Node) -> Option<&C> {
        self.arena.get(&node).map(|visit| &visit.seen)
    }

    /// Finalized cost of `node`
    pub fn distance(&self, node: G::Node) -> Option<&C> {
        self.arena.get(&node)?.distance.as_ref()
    }

    /// Every node this frontier has reached, in arena order
    pub fn visits(&self) -> impl Iterator<Item = (G::Node, &Visit<G::Relationship, C>)> {
        self.arena.iter().map(|(&node, visit)| (node, visit))
    }
}

impl<R: Copy + PartialEq, C> Visit<R, C> {

    /// Record another equal-cost way in, seeds never get predecessors
    fn add_predecessor(&mut self, relationship: R, from: usize) {
        if !self.seed && !self.predecessors.contains(&(relationship, from)) {
            self.predecessors.push((relationship, from));
        }
    }
}

impl<G: Graph, C> PredecessorArena for Frontier<G, C> {
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
            .map(|(_, visit)| visit.predecessors.as_slice())
            .unwrap_or_default()
    }

    fn is_seed(&self, index: usize) -> bool {
        self.arena.get_index(index).is_some_and(|(_, visit)| visit.seed)
    }
}
