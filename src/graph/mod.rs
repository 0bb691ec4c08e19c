pub mod simple;

use std::{fmt::{self, Debug, Display}, hash::Hash};

pub use simple::SimpleGraph;


/// Direction of a relationship relative to a node
/// Used both as an adjacency filter and as the logical direction handed to cost evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing, // node is the stored start of the relationship
    Incoming, // node is the stored end of the relationship
    Both,
}

impl Direction {

    /// The direction seen from the other end of the relationship
    /// `Both` stays `Both`
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}


/// Named relationship type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipType(String);

impl RelationshipType {

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelationshipType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


/// Property value stored on a relationship
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}


/// Read-only graph access consumed by the algorithms
///
/// Implementations must present a stable view for the duration of a search.
/// Searches only ever borrow the graph immutably, so independent searches may
/// share one graph across threads when the implementation is `Sync`.
pub trait Graph {
    type Node: Copy + Eq + Hash + Debug;
    type Relationship: Copy + Eq + Hash + Debug;

    /// Relationships adjacent to `node` with a type in `types`
    /// `direction` is relative to `node`, a self-loop is yielded once
    fn relationships(
        &self,
        node: Self::Node,
        direction: Direction,
        types: &[RelationshipType],
    ) -> impl Iterator<Item = Self::Relationship>;

    /// Stored (start, end) of a relationship
    fn endpoints(&self, relationship: Self::Relationship) -> (Self::Node, Self::Node);

    fn has_relationship_type(&self, relationship_type: &RelationshipType) -> bool;

    fn property(&self, relationship: Self::Relationship, key: &str) -> Option<PropertyValue>;

    /// The endpoint of `relationship` that is not `node`
    fn other_node(&self, relationship: Self::Relationship, node: Self::Node) -> Self::Node {
        let (start, end) = self.endpoints(relationship);
        if start == node { end } else { start }
    }

    /// Stored direction of `relationship` as seen from `from`
    fn physical_direction(&self, relationship: Self::Relationship, from: Self::Node) -> Direction {
        let (start, _) = self.endpoints(relationship);
        if start == from { Direction::Outgoing } else { Direction::Incoming }
    }
}
