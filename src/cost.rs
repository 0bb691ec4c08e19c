//! Pluggable cost domain
//!
//! A search never assumes a numeric cost type. It is handed a `CostModel`:
//! an evaluator producing the cost of one relationship traversal, an
//! accumulator combining two costs, a comparator ordering them, and the zero
//! cost that seeds a search.
//!
//! The algorithms rely on (but do not check) the usual preconditions: the
//! comparator is a total order, the accumulator is associative and
//! order-compatible, and evaluated costs are never below zero.

use std::{cmp::Ordering, fmt::Debug};
use num_traits::{Num, NumCast};

use crate::errors::{PathError, Result};
use crate::graph::{Direction, Graph, PropertyValue};


/// Cost of traversing one relationship in a logical direction
pub trait CostEvaluator<G: Graph, C> {
    fn cost(&self, graph: &G, relationship: G::Relationship, direction: Direction) -> Result<C>;
}

/// Combines two costs, typically addition
pub trait CostAccumulator<C> {
    fn add(&self, a: &C, b: &C) -> C;
}

/// Orders two costs
pub trait CostComparator<C> {
    fn compare(&self, a: &C, b: &C) -> Ordering;
}

impl<G, C, F> CostEvaluator<G, C> for F
where
    G: Graph,
    F: Fn(G::Relationship, Direction) -> C,
{
    fn cost(&self, _graph: &G, relationship: G::Relationship, direction: Direction) -> Result<C> {
        Ok(self(relationship, direction))
    }
}

impl<C, F> CostAccumulator<C> for F
where
    F: Fn(&C, &C) -> C,
{
    fn add(&self, a: &C, b: &C) -> C {
        self(a, b)
    }
}

impl<C, F> CostComparator<C> for F
where
    F: Fn(&C, &C) -> Ordering,
{
    fn compare(&self, a: &C, b: &C) -> Ordering {
        self(a, b)
    }
}


/// Numeric addition for any `Num` cost (integers, floats)
#[derive(Debug, Clone, Copy, Default)]
pub struct Adder;

impl<C: Num + Copy> CostAccumulator<C> for Adder {
    fn add(&self, a: &C, b: &C) -> C {
        *a + *b
    }
}


/// Ordering taken from `PartialOrd`
/// Incomparable values (NaN) compare equal
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<C: PartialOrd> CostComparator<C> for NaturalOrder {
    fn compare(&self, a: &C, b: &C) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }
}


/// Reads the cost from a numeric relationship property
/// The same cost applies in both directions
#[derive(Debug, Clone)]
pub struct PropertyEvaluator {
    key: String,
}

impl PropertyEvaluator {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl<G: Graph, C: NumCast> CostEvaluator<G, C> for PropertyEvaluator {
    fn cost(&self, graph: &G, relationship: G::Relationship, _direction: Direction) -> Result<C> {
        let value = graph.property(relationship, &self.key).ok_or_else(|| PathError::MissingCostProperty {
            relationship: format!("{relationship:?}"),
            key: self.key.clone(),
        })?;

        let cost = match value {
            PropertyValue::Integer(value) => C::from(value),
            PropertyValue::Float(value) => C::from(value),
            PropertyValue::Text(_) => None,
        };
        cost.ok_or_else(|| PathError::InvalidCostProperty {
            relationship: format!("{relationship:?}"),
            key: self.key.clone(),
        })
    }
}


/// Every relationship costs the same
#[derive(Debug, Clone)]
pub struct ConstantEvaluator<C>(pub C);

impl<G: Graph, C: Clone> CostEvaluator<G, C> for ConstantEvaluator<C> {
    fn cost(&self, _graph: &G, _relationship: G::Relationship, _direction: Direction) -> Result<C> {
        Ok(self.0.clone())
    }
}


/// Evaluator, accumulator, comparator and zero cost bundled for one algorithm
/// Boxed so the algorithms stay generic over the graph and cost type only
pub struct CostModel<'a, G: Graph, C> {
    zero: C,
    evaluator: Box<dyn CostEvaluator<G, C> + 'a>,
    accumulator: Box<dyn CostAccumulator<C> + 'a>,
    comparator: Box<dyn CostComparator<C> + 'a>,
}

impl<'a, G: Graph, C: Clone> CostModel<'a, G, C> {

    pub fn new<E, A, K>(zero: C, evaluator: E, accumulator: A, comparator: K) -> Self
    where
        E: CostEvaluator<G, C> + 'a,
        A: CostAccumulator<C> + 'a,
        K: CostComparator<C> + 'a,
    {
        Self {
            zero,
            evaluator: Box::new(evaluator),
            accumulator: Box::new(accumulator),
            comparator: Box::new(comparator),
        }
    }

    pub fn zero(&self) -> &C {
        &self.zero
    }

    pub fn evaluate(&self, graph: &G, relationship: G::Relationship, direction: Direction) -> Result<C> {
        self.evaluator.cost(graph, relationship, direction)
    }

    pub fn add(&self, a: &C, b: &C) -> C {
        self.accumulator.add(a, b)
    }

    pub fn compare(&self, a: &C, b: &C) -> Ordering {
        self.comparator.compare(a, b)
    }

    pub fn is_less(&self, a: &C, b: &C) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    pub fn is_equal(&self, a: &C, b: &C) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    pub(crate) fn comparator(&self) -> &dyn CostComparator<C> {
        self.comparator.as_ref()
    }
}

impl<'a, G: Graph, C: Clone + Num + NumCast + PartialOrd + Copy + 'a> CostModel<'a, G, C> {

    /// Numeric model reading costs from a relationship property
    pub fn numeric(key: &str) -> Self {
        Self::new(C::zero(), PropertyEvaluator::new(key), Adder, NaturalOrder)
    }
}

impl<G: Graph, C: Debug> Debug for CostModel<'_, G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostModel").field("zero", &self.zero).finish_non_exhaustive()
    }
}
