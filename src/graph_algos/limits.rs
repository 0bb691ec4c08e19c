use std::cell::Cell;


/// Caps on how much of the graph a search may explore
/// Hitting a cap is not an error: the search stops and reports what it found,
/// which may be a suboptimal or absent result even when a path exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalLimits<C> {
    pub max_nodes: Option<u64>, // finalized nodes, summed over all frontiers
    pub max_relationships: Option<u64>, // relaxed relationships, summed over all frontiers
    pub max_cost: Option<C>, // paths costing more than this are not reported
}

impl<C> Default for TraversalLimits<C> {
    fn default() -> Self {
        Self {
            max_nodes: None,
            max_relationships: None,
            max_cost: None,
        }
    }
}

impl<C> TraversalLimits<C> {
    pub fn unlimited() -> Self {
        Self::default()
    }
}


/// Counters shared by the frontiers of one search
/// A single thread drives every frontier, so plain cells suffice
#[derive(Debug, Default)]
pub(crate) struct TraversalBudget {
    max_nodes: Option<u64>,
    max_relationships: Option<u64>,
    nodes: Cell<u64>,
    relationships: Cell<u64>,
}

impl TraversalBudget {

    pub fn new<C>(limits: &TraversalLimits<C>) -> Self {
        Self {
            max_nodes: limits.max_nodes,
            max_relationships: limits.max_relationships,
            ..Self::default()
        }
    }

    /// True once either counter has reached its cap
    pub fn exhausted(&self) -> bool {
        self.max_nodes.is_some_and(|max| self.nodes.get() >= max)
            || self.max_relationships.is_some_and(|max| self.relationships.get() >= max)
    }

    pub fn relationships_exhausted(&self) -> bool {
        self.max_relationships.is_some_and(|max| self.relationships.get() >= max)
    }

    pub fn count_node(&self) {
        self.nodes.set(self.nodes.get() + 1);
    }

    pub fn count_relationship(&self) {
        self.relationships.set(self.relationships.get() + 1);
    }

    pub fn stats(&self) -> TraversalStats {
        TraversalStats {
            nodes_traversed: self.nodes.get(),
            relationships_traversed: self.relationships.get(),
        }
    }
}


/// What a finished search explored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub nodes_traversed: u64,
    pub relationships_traversed: u64,
}
