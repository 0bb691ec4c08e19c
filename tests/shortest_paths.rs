//! Integration scenarios across the shortest path algorithms
//!
//! Each test builds a small in-memory graph and checks a property that must
//! hold whatever the search order inside the algorithms.

use std::cell::RefCell;

use graphalgo::graph::simple::{NodeId, RelId};
use graphalgo::{
    Adder, ConstantEvaluator, CostModel, Dijkstra, Direction, FloydWarshall, NaturalOrder, RelationshipType,
    SimpleGraph, SingleSourceDijkstra, SingleSourceShortestPath, TraversalLimits,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn types(names: &[&str]) -> Vec<RelationshipType> {
    names.iter().map(|&name| RelationshipType::from(name)).collect()
}

fn node(graph: &SimpleGraph, name: &str) -> NodeId {
    graph.node(name).unwrap()
}

fn route(graph: &SimpleGraph, nodes: &[NodeId]) -> String {
    nodes.iter().map(|&node| graph.name(node)).collect::<Vec<_>>().join("-")
}

fn bidirectional<'a>(
    graph: &'a SimpleGraph,
    start: &str,
    end: &str,
    direction: Direction,
) -> Dijkstra<'a, SimpleGraph, f64> {
    Dijkstra::new(
        graph,
        node(graph, start),
        node(graph, end),
        CostModel::numeric("cost"),
        direction,
        &types(&["LINK"]),
    )
    .unwrap()
}

/// Random directed graph with integer costs, nodes named n0..n{size}
fn random_graph(rng: &mut StdRng, size: usize, relationships: usize) -> SimpleGraph {
    let mut graph = SimpleGraph::new();
    for i in 0..size {
        graph.node_or_create(&format!("n{i}"));
    }
    for _ in 0..relationships {
        let start = rng.random_range(0..size);
        let end = rng.random_range(0..size);
        let cost: i64 = rng.random_range(1..10);
        graph.connect_with_cost(&format!("n{start}"), &format!("n{end}"), "LINK", "cost", cost);
    }
    graph.add_relationship_type("LINK");
    graph
}


/// Undirected costs are the same both ways
#[test]
fn test_symmetry_under_both() {
    let mut rng = StdRng::seed_from_u64(7);
    let graph = random_graph(&mut rng, 8, 14);

    for a in graph.nodes() {
        for b in graph.nodes() {
            let model = || CostModel::<SimpleGraph, i64>::numeric("cost");
            let there = Dijkstra::new(&graph, a, b, model(), Direction::Both, &types(&["LINK"]))
                .unwrap()
                .cost()
                .unwrap();
            let back = Dijkstra::new(&graph, b, a, model(), Direction::Both, &types(&["LINK"]))
                .unwrap()
                .cost()
                .unwrap();
            assert_eq!(there, back, "{} <-> {}", graph.name(a), graph.name(b));
        }
    }
}

/// Zero offset of 3.0 is applied once per frontier
#[test]
fn test_zero_length_path() {
    let mut graph = SimpleGraph::new();
    graph.connect_with_cost("x", "y", "LINK", "cost", 1.0);
    let x = node(&graph, "x");

    let model = CostModel::new(3.0, ConstantEvaluator(1.0), Adder, NaturalOrder);
    let mut dijkstra = Dijkstra::new(&graph, x, x, model, Direction::Both, &types(&["LINK"])).unwrap();

    assert_eq!(dijkstra.cost().unwrap(), Some(6.0));
    let paths = dijkstra.paths().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[x]);
    assert!(paths[0].relationships().is_empty());
}

/// Zero-cost triangle: the direct hop and the detour through the third node
#[test]
fn test_zero_cost_triangle_multiplicity() {
    let mut graph = SimpleGraph::new();
    graph.connect_with_cost("a", "b", "LINK", "cost", 0.0);
    graph.connect_with_cost("b", "c", "LINK", "cost", 0.0);
    graph.connect_with_cost("c", "a", "LINK", "cost", 0.0);

    for (start, end) in [("a", "b"), ("b", "c"), ("c", "a"), ("b", "a")] {
        let mut dijkstra = bidirectional(&graph, start, end, Direction::Both);
        assert_eq!(dijkstra.cost().unwrap(), Some(0.0));
        assert_eq!(dijkstra.paths().unwrap().len(), 2, "{start} -> {end}");
    }

    let mut same = bidirectional(&graph, "a", "a", Direction::Both);
    assert_eq!(same.paths().unwrap().len(), 1);
}

/// Two forks of two equal branches each give four paths
#[test]
fn test_cartesian_path_counting() {
    let mut graph = SimpleGraph::new();
    for (start, end) in [
        ("s", "x1"), ("s", "x2"), ("x1", "m"), ("x2", "m"),
        ("m", "y1"), ("m", "y2"), ("y1", "t"), ("y2", "t"),
    ] {
        graph.connect_with_cost(start, end, "LINK", "cost", 1.0);
    }

    for direction in [Direction::Outgoing, Direction::Both] {
        let mut dijkstra = bidirectional(&graph, "s", "t", direction);
        assert_eq!(dijkstra.cost().unwrap(), Some(4.0));

        let mut routes: Vec<_> = dijkstra
            .paths_as_nodes()
            .unwrap()
            .iter()
            .map(|nodes| route(&graph, nodes))
            .collect();
        routes.sort();
        assert_eq!(routes, vec![
            "s-x1-m-y1-t",
            "s-x1-m-y2-t",
            "s-x2-m-y1-t",
            "s-x2-m-y2-t",
        ]);
    }
}

/// The evaluator is told the direction of the search, not the storage
#[test]
fn test_direction_fidelity() {
    let mut graph = SimpleGraph::new();
    for (start, end) in [("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")] {
        graph.connect(start, end, "LINK");
    }
    graph.connect("c", "a", "LINK");

    for (direction, start, end) in [(Direction::Outgoing, "a", "d"), (Direction::Incoming, "d", "a")] {
        let observed = RefCell::new(Vec::new());
        let model = CostModel::new(
            0.0,
            |_rel: RelId, direction: Direction| {
                observed.borrow_mut().push(direction);
                1.0
            },
            Adder,
            NaturalOrder,
        );
        let mut dijkstra = Dijkstra::new(
            &graph,
            node(&graph, start),
            node(&graph, end),
            model,
            direction,
            &types(&["LINK"]),
        )
        .unwrap();

        assert_eq!(dijkstra.cost().unwrap(), Some(1.0));
        let observed = observed.borrow();
        assert!(!observed.is_empty());
        assert!(observed.iter().all(|&seen| seen == direction), "{direction:?}: {observed:?}");
    }
}

/// Under Both every evaluation reports the physical direction of the hop it prices
#[test]
fn test_direction_under_both_follows_traversal() {
    let mut graph = SimpleGraph::new();
    graph.connect("a", "b", "LINK");
    graph.connect("c", "b", "LINK");
    let ab = graph.relationship("a", "b").unwrap();
    let cb = graph.relationship("c", "b").unwrap();

    let observed = RefCell::new(Vec::new());
    let model = CostModel::new(
        0.0,
        |rel: RelId, direction: Direction| {
            observed.borrow_mut().push((rel, direction));
            1.0
        },
        Adder,
        NaturalOrder,
    );
    let mut dijkstra = Dijkstra::new(
        &graph,
        node(&graph, "a"),
        node(&graph, "c"),
        model,
        Direction::Both,
        &types(&["LINK"]),
    )
    .unwrap();

    assert_eq!(dijkstra.cost().unwrap(), Some(2.0));
    // Read from a to c, a -> b is walked along its storage and c -> b against it
    let observed = observed.borrow();
    assert!(observed.contains(&(ab, Direction::Outgoing)));
    assert!(observed.contains(&(cb, Direction::Incoming)));
}

/// Budget of three nodes on a six node chain
#[test]
fn test_node_budget_enforced() {
    let mut graph = SimpleGraph::new();
    for (start, end) in [("n0", "n1"), ("n1", "n2"), ("n2", "n3"), ("n3", "n4"), ("n4", "n5")] {
        graph.connect_with_cost(start, end, "LINK", "cost", 1.0);
    }

    let mut dijkstra = bidirectional(&graph, "n0", "n5", Direction::Both);
    dijkstra.limit_max_nodes_to_traverse(3);

    assert!(!dijkstra.calculate().unwrap());
    assert_eq!(dijkstra.stats().nodes_traversed, 3);
    assert!(dijkstra.paths().unwrap().is_empty());

    let mut unlimited = bidirectional(&graph, "n0", "n5", Direction::Both).with_limits(TraversalLimits::unlimited());
    assert_eq!(unlimited.cost().unwrap(), Some(5.0));
}

/// All pairs agree with point to point searches, including unreachable pairs
#[test]
fn test_floyd_warshall_matches_dijkstra() {
    let mut rng = StdRng::seed_from_u64(42);

    for round in 0..5 {
        let size = rng.random_range(4..9);
        let relationships = rng.random_range(size..size * 3);
        let graph = random_graph(&mut rng, size, relationships);

        for direction in [Direction::Outgoing, Direction::Incoming] {
            let mut fw = FloydWarshall::new(
                &graph,
                CostModel::<SimpleGraph, i64>::numeric("cost"),
                i64::MAX,
                direction,
                graph.nodes(),
                graph.all_relationships(),
            )
            .unwrap();

            for a in graph.nodes() {
                for b in graph.nodes() {
                    let model = CostModel::<SimpleGraph, i64>::numeric("cost");
                    let expected = Dijkstra::new(&graph, a, b, model, direction, &types(&["LINK"]))
                        .unwrap()
                        .cost()
                        .unwrap();
                    let all_pairs = fw.cost(a, b).unwrap();
                    let context = format!("round {round} {direction:?} {} -> {}", graph.name(a), graph.name(b));

                    match expected {
                        Some(cost) => {
                            assert_eq!(all_pairs, cost, "{context}");
                            let path = fw.path(a, b).unwrap();
                            assert_eq!(path.first(), Some(&a), "{context}");
                            assert_eq!(path.last(), Some(&b), "{context}");
                        }
                        None => {
                            assert_eq!(all_pairs, i64::MAX, "{context}");
                            assert!(fw.path(a, b).unwrap().is_empty(), "{context}");
                        }
                    }
                }
            }
        }
    }
}

/// Each extra shortcut type lowers the cost past it, both together lower it most
#[test]
fn test_multi_type_union() {
    let mut graph = SimpleGraph::new();
    for (start, end) in [("n0", "n1"), ("n1", "n2"), ("n2", "n3"), ("n3", "n4"), ("n4", "n5")] {
        graph.connect_with_cost(start, end, "LINK", "cost", 1.0);
    }
    graph.connect_with_cost("n0", "n2", "HOP", "cost", 1.0);
    graph.connect_with_cost("n2", "n5", "JUMP", "cost", 1.0);

    let cost_to = |names: &[&str], target: &str| {
        let mut sssp = SingleSourceDijkstra::new(
            &graph,
            node(&graph, "n0"),
            CostModel::<SimpleGraph, f64>::numeric("cost"),
            Direction::Outgoing,
            &types(names),
        )
        .unwrap();
        sssp.cost(node(&graph, target)).unwrap()
    };

    assert_eq!(cost_to(&["LINK"], "n5"), Some(5.0));
    assert_eq!(cost_to(&["LINK", "HOP"], "n5"), Some(4.0));
    assert_eq!(cost_to(&["LINK", "JUMP"], "n5"), Some(3.0));
    assert_eq!(cost_to(&["LINK", "HOP", "JUMP"], "n5"), Some(2.0));

    assert_eq!(cost_to(&["LINK"], "n3"), Some(3.0));
    assert_eq!(cost_to(&["LINK", "HOP"], "n3"), Some(2.0));
    assert_eq!(cost_to(&["LINK"], "n1"), cost_to(&["LINK", "HOP"], "n1"));
}
