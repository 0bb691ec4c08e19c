use crate::path::Path;


/// Arena of reached nodes with their predecessor lists
/// Seeds are the roots every reconstructed path starts from
pub(crate) trait PredecessorArena {
    type Node: Copy + PartialEq;
    type Relationship: Copy;

    fn index_of(&self, node: Self::Node) -> Option<usize>;
    fn node_at(&self, index: usize) -> Option<Self::Node>;
    fn predecessors_at(&self, index: usize) -> &[(Self::Relationship, usize)];
    fn is_seed(&self, index: usize) -> bool;
}


/// Every path from a seed to `target`, ordered seed -> target
/// Branches once per predecessor at every node; branches revisiting a node are
/// dropped so zero-cost cycles stay finite.
pub(crate) fn all_shortest_paths<A: PredecessorArena>(
    arena: &A,
    target: A::Node,
) -> Vec<Path<A::Node, A::Relationship>> {
    let mut paths = Vec::new();
    if let Some(index) = arena.index_of(target) {
        let mut trail = Vec::new();
        let mut relationships = Vec::new();
        collect_paths(arena, index, &mut trail, &mut relationships, &mut paths);
    }
    paths
}

/// Walk predecessors from `index` back to a seed
/// trail holds arena indices target-first, relationships[i] joins trail[i] and trail[i + 1]
fn collect_paths<A: PredecessorArena>(
    arena: &A,
    index: usize,
    trail: &mut Vec<usize>,
    relationships: &mut Vec<A::Relationship>,
    paths: &mut Vec<Path<A::Node, A::Relationship>>,
) {
    trail.push(index);

    if arena.is_seed(index) {
        if let Some(path) = build_path(arena, trail, relationships) {
            paths.push(path);
        }
    } else {
        for &(relationship, predecessor) in arena.predecessors_at(index) {
            if trail.contains(&predecessor) {
                continue;
            }
            relationships.push(relationship);
            collect_paths(arena, predecessor, trail, relationships, paths);
            relationships.pop();
        }
    }

    trail.pop();
}

/// The trail is in reverse order, so build the path from its far end
fn build_path<A: PredecessorArena>(
    arena: &A,
    trail: &[usize],
    relationships: &[A::Relationship],
) -> Option<Path<A::Node, A::Relationship>> {
    let mut path = Path::single(arena.node_at(*trail.last()?)?);
    for i in (0..relationships.len()).rev() {
        path.push(relationships[i], arena.node_at(trail[i])?);
    }
    Some(path)
}


/// One shortest path from a seed to `target`, following the first predecessor
/// The first predecessor is always finalized before the node it leads to, so
/// the walk cannot loop.
pub(crate) fn first_shortest_path<A: PredecessorArena>(
    arena: &A,
    target: A::Node,
) -> Option<Path<A::Node, A::Relationship>> {
    let mut trail = Vec::new();
    let mut relationships = Vec::new();
    let mut current_index = arena.index_of(target)?;

    // Trace back from target to seed
    loop {
        trail.push(current_index);
        if arena.is_seed(current_index) {
            break;
        }
        let &(relationship, predecessor) = arena.predecessors_at(current_index).first()?;
        relationships.push(relationship);
        current_index = predecessor;
    }

    build_path(arena, &trail, &relationships)
}
