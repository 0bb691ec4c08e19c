use crate::collections::{FxHashMap, FxIndexSet};
use super::{Direction, Graph, PropertyValue, RelationshipType};


/// Node handle in a `SimpleGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Relationship handle in a `SimpleGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelId(usize);

#[derive(Debug)]
struct RelationshipData {
    start: NodeId,
    end: NodeId,
    type_index: usize,
    properties: FxHashMap<String, PropertyValue>,
}


/// Small in-memory graph
/// Nodes are addressed by name, relationships are append only
#[derive(Debug, Default)]
pub struct SimpleGraph {
    names: FxIndexSet<String>, // node index -> name
    relationships: Vec<RelationshipData>,
    outgoing: Vec<Vec<RelId>>,
    incoming: Vec<Vec<RelId>>,
    types: FxIndexSet<RelationshipType>,
}

impl SimpleGraph {

    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node, creating it on first use
    pub fn node_or_create(&mut self, name: &str) -> NodeId {
        if let Some(index) = self.names.get_index_of(name) {
            return NodeId(index);
        }
        let index = self.names.insert_full(name.to_string()).0;
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        NodeId(index)
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.names.get_index_of(name).map(NodeId)
    }

    pub fn name(&self, node: NodeId) -> &str {
        self.names.get_index(node.0).map(String::as_str).unwrap_or_default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.names.len()).map(NodeId)
    }

    pub fn all_relationships(&self) -> impl Iterator<Item = RelId> {
        (0..self.relationships.len()).map(RelId)
    }

    /// Register a relationship type without creating a relationship
    pub fn add_relationship_type(&mut self, relationship_type: &str) {
        self.types.insert(RelationshipType::new(relationship_type));
    }

    /// Create a relationship `start -> end`, creating missing nodes
    pub fn connect(&mut self, start: &str, end: &str, relationship_type: &str) -> RelId {
        let start = self.node_or_create(start);
        let end = self.node_or_create(end);
        let type_index = self.types.insert_full(RelationshipType::new(relationship_type)).0;

        let id = RelId(self.relationships.len());
        self.relationships.push(RelationshipData {
            start,
            end,
            type_index,
            properties: FxHashMap::default(),
        });
        self.outgoing[start.0].push(id);
        if start != end {
            self.incoming[end.0].push(id);
        }
        id
    }

    /// Create a relationship carrying a single cost property
    pub fn connect_with_cost(
        &mut self,
        start: &str,
        end: &str,
        relationship_type: &str,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> RelId {
        let id = self.connect(start, end, relationship_type);
        self.set_property(id, key, value);
        id
    }

    pub fn set_property(&mut self, relationship: RelId, key: &str, value: impl Into<PropertyValue>) {
        if let Some(data) = self.relationships.get_mut(relationship.0) {
            data.properties.insert(key.to_string(), value.into());
        }
    }

    /// First relationship stored as `start -> end`
    pub fn relationship(&self, start: &str, end: &str) -> Option<RelId> {
        let (start, end) = (self.node(start)?, self.node(end)?);
        self.outgoing[start.0]
            .iter()
            .copied()
            .find(|id| self.relationships[id.0].end == end)
    }

    pub fn relationship_type(&self, relationship: RelId) -> Option<&RelationshipType> {
        let data = self.relationships.get(relationship.0)?;
        self.types.get_index(data.type_index)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    fn type_matches(&self, relationship: RelId, types: &[RelationshipType]) -> bool {
        self.relationship_type(relationship)
            .is_some_and(|relationship_type| types.contains(relationship_type))
    }
}

impl Graph for SimpleGraph {
    type Node = NodeId;
    type Relationship = RelId;

    fn relationships(
        &self,
        node: NodeId,
        direction: Direction,
        types: &[RelationshipType],
    ) -> impl Iterator<Item = RelId> {
        let outgoing: &[RelId] = match direction {
            Direction::Outgoing | Direction::Both => &self.outgoing[node.0],
            Direction::Incoming => &[],
        };
        let incoming: &[RelId] = match direction {
            Direction::Incoming | Direction::Both => &self.incoming[node.0],
            Direction::Outgoing => &[],
        };
        outgoing
            .iter()
            .chain(incoming.iter())
            .copied()
            .filter(move |&id| self.type_matches(id, types))
    }

    fn endpoints(&self, relationship: RelId) -> (NodeId, NodeId) {
        let data = &self.relationships[relationship.0];
        (data.start, data.end)
    }

    fn has_relationship_type(&self, relationship_type: &RelationshipType) -> bool {
        self.types.contains(relationship_type)
    }

    fn property(&self, relationship: RelId, key: &str) -> Option<PropertyValue> {
        self.relationships.get(relationship.0)?.properties.get(key).cloned()
    }
}
