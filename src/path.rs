/// Path through the graph
///
/// Alternating sequence of nodes and relationships:
/// (n0) -[r0]- (n1) -[r1]- ... -[rk]- (nk+1)
///
/// Invariant: `nodes.len() == relationships.len() + 1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path<N, R> {
    nodes: Vec<N>,
    relationships: Vec<R>,
}

/// One element of the interleaved projection of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathElement<N, R> {
    Node(N),
    Relationship(R),
}

impl<N: Copy + PartialEq, R: Copy> Path<N, R> {

    /// Zero-length path, a single node and no relationships
    pub fn single(node: N) -> Self {
        Self {
            nodes: vec![node],
            relationships: Vec::new(),
        }
    }

    /// Extend the path by one relationship leading to `node`
    pub fn push(&mut self, relationship: R, node: N) {
        self.relationships.push(relationship);
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[R] {
        &self.relationships
    }

    /// Interleaved node / relationship / node / ... / node projection
    pub fn elements(&self) -> Vec<PathElement<N, R>> {
        let mut elements = Vec::with_capacity(self.nodes.len() + self.relationships.len());
        for (i, &node) in self.nodes.iter().enumerate() {
            if i > 0 {
                elements.push(PathElement::Relationship(self.relationships[i - 1]));
            }
            elements.push(PathElement::Node(node));
        }
        elements
    }

    pub fn start(&self) -> N {
        self.nodes[0]
    }

    pub fn end(&self) -> N {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn contains(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    pub fn reversed(&self) -> Self {
        let mut nodes = self.nodes.clone();
        let mut relationships = self.relationships.clone();
        nodes.reverse();
        relationships.reverse();
        Self { nodes, relationships }
    }

    /// Concatenate `other`, which must start where `self` ends
    /// Returns `None` when the paths do not share the join node
    pub fn join(&self, other: &Self) -> Option<Self> {
        if self.end() != other.start() {
            return None;
        }
        let mut joined = self.clone();
        joined.nodes.extend_from_slice(&other.nodes[1..]);
        joined.relationships.extend_from_slice(&other.relationships);
        Some(joined)
    }
}
