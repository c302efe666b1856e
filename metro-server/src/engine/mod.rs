//! Single-source shortest-time search with path reconstruction.
//!
//! The engine is a set of pure functions over an immutable [`Graph`]: every
//! query allocates its own cost table, so there is no shared query state to
//! reset and concurrent queries cannot observe each other. Search is a
//! binary-heap Dijkstra whose heap order is `(cost, node id)`; equal-cost
//! nodes therefore settle in lexicographic order and results, tie-breaks
//! included, are reproducible run to run. That determinism is part of the
//! engine's contract, not an implementation accident.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::{NodeId, QueryError, Route, RouteOutcome};
use crate::graph::Graph;

/// Best known cost and predecessor for one node during a search.
#[derive(Debug, Clone, PartialEq)]
struct Label {
    /// Tentative cost in minutes; infinite while unreached.
    cost: f64,
    predecessor: Option<NodeId>,
}

impl Label {
    fn unreached() -> Self {
        Self {
            cost: f64::INFINITY,
            predecessor: None,
        }
    }
}

/// The full result of a single-source search: best cost and predecessor for
/// every node in the graph.
///
/// Freshly allocated per query and immutable once returned. Unreachable
/// nodes report no cost rather than an infinite one.
#[derive(Debug, Clone)]
pub struct CostTable {
    source: NodeId,
    labels: HashMap<NodeId, Label>,
}

impl CostTable {
    /// The node this table was computed from.
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Shortest time in minutes from the source to `node`, if reachable.
    pub fn cost(&self, node: &NodeId) -> Option<f64> {
        self.labels
            .get(node)
            .and_then(|label| label.cost.is_finite().then_some(label.cost))
    }

    pub fn is_reachable(&self, node: &NodeId) -> bool {
        self.cost(node).is_some()
    }

    fn predecessor(&self, node: &NodeId) -> Option<&NodeId> {
        self.labels.get(node).and_then(|l| l.predecessor.as_ref())
    }
}

/// Heap entry ordered so the cheapest cost pops first, with the
/// lexicographically smallest node winning cost ties.
struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; comparisons are reversed so `pop`
        // yields the minimum.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Compute shortest times from `source` to every node in the graph.
///
/// Fails with [`QueryError::UnknownNode`] if `source` is not in the node
/// set.
pub fn cost_table(graph: &Graph, source: &NodeId) -> Result<CostTable, QueryError> {
    if !graph.contains(source) {
        return Err(QueryError::UnknownNode(source.clone()));
    }

    let mut labels: HashMap<NodeId, Label> = graph
        .nodes()
        .iter()
        .map(|n| (n.clone(), Label::unreached()))
        .collect();
    if let Some(label) = labels.get_mut(source) {
        label.cost = 0.0;
    }

    let mut settled: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        cost: 0.0,
        node: source.clone(),
    });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if !settled.insert(node.clone()) {
            // Stale entry superseded by a cheaper relaxation.
            continue;
        }
        trace!(node = %node, cost, "settled");

        for (neighbor, attrs) in graph.neighbors(&node) {
            if settled.contains(neighbor) {
                continue;
            }
            let candidate = cost + attrs.time_mins;
            if let Some(label) = labels.get_mut(neighbor) {
                if candidate < label.cost {
                    label.cost = candidate;
                    label.predecessor = Some(node.clone());
                    heap.push(HeapEntry {
                        cost: candidate,
                        node: neighbor.clone(),
                    });
                }
            }
        }
    }

    debug!(source = %source, settled = settled.len(), "cost table complete");
    Ok(CostTable {
        source: source.clone(),
        labels,
    })
}

/// Compute the minimum-time path between two nodes.
///
/// Fails with [`QueryError::UnknownNode`] if either endpoint is absent; the
/// error names the offending endpoint. A disconnected pair is a normal
/// [`RouteOutcome::Unreachable`] outcome, not an error.
pub fn shortest_path(
    graph: &Graph,
    source: &NodeId,
    destination: &NodeId,
) -> Result<RouteOutcome, QueryError> {
    if !graph.contains(source) {
        return Err(QueryError::UnknownNode(source.clone()));
    }
    if !graph.contains(destination) {
        return Err(QueryError::UnknownNode(destination.clone()));
    }
    // Staying put costs nothing; the search loop never needs to run.
    if source == destination {
        return Ok(RouteOutcome::Found(Route::single(source.clone())));
    }

    let table = cost_table(graph, source)?;
    reconstruct(graph, &table, destination)
}

/// Rebuild the path source → `destination` from a finished cost table.
///
/// Walks predecessor links backwards and reverses. A chain that breaks or
/// cycles before reaching the source means the table is corrupt; that is a
/// bug in the engine and is reported as a fatal error, never as a truncated
/// path.
pub(crate) fn reconstruct(
    graph: &Graph,
    table: &CostTable,
    destination: &NodeId,
) -> Result<RouteOutcome, QueryError> {
    if destination == table.source() {
        return Ok(RouteOutcome::Found(Route::single(destination.clone())));
    }
    let Some(total_time) = table.cost(destination) else {
        return Ok(RouteOutcome::Unreachable);
    };

    let mut nodes = vec![destination.clone()];
    let mut distance_km = 0.0;
    let mut current = destination;

    while current != table.source() {
        if nodes.len() > graph.node_count() {
            // More steps than nodes: the chain loops.
            return Err(QueryError::BrokenPredecessorChain {
                node: current.clone(),
            });
        }
        let Some(pred) = table.predecessor(current) else {
            return Err(QueryError::BrokenPredecessorChain {
                node: current.clone(),
            });
        };
        let Some(attrs) = graph.weight(pred, current) else {
            // Predecessor without a connecting edge: equally corrupt.
            return Err(QueryError::BrokenPredecessorChain {
                node: current.clone(),
            });
        };
        distance_km += attrs.distance_km;
        nodes.push(pred.clone());
        current = pred;
    }

    nodes.reverse();
    Ok(RouteOutcome::Found(Route::new(nodes, total_time, distance_km)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Converter, EdgeKind, GraphBuilder};

    fn node(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    /// Build a graph from `(a, b, minutes)` triples; the time weight doubles
    /// as the distance so totals are easy to check.
    fn graph_of(edges: &[(&str, &str, f64)]) -> Graph {
        let mut builder = GraphBuilder::new(Converter::default());
        for (a, b, w) in edges {
            builder = builder.weighted(node(a), node(b), *w, *w, EdgeKind::Ride);
        }
        builder.build().unwrap()
    }

    /// The network from the original system's acceptance scenario: one
    /// transfer between lines 1 and 2 at station C.
    fn two_line_graph() -> Graph {
        GraphBuilder::new(Converter::default())
            .weighted(node("A(1)"), node("B(1)"), 5.0, 5.0, EdgeKind::Ride)
            .weighted(node("B(1)"), node("C(1)"), 5.0, 5.0, EdgeKind::Ride)
            .transfer(node("C(1)"), node("C(2)"))
            .weighted(node("C(2)"), node("D(2)"), 4.0, 4.0, EdgeKind::Ride)
            .build()
            .unwrap()
    }

    fn found(outcome: RouteOutcome) -> Route {
        match outcome {
            RouteOutcome::Found(route) => route,
            RouteOutcome::Unreachable => panic!("expected a route"),
        }
    }

    #[test]
    fn crosses_lines_through_the_transfer() {
        let graph = two_line_graph();
        let route = found(shortest_path(&graph, &node("A(1)"), &node("D(2)")).unwrap());

        assert_eq!(
            route.nodes(),
            &[node("A(1)"), node("B(1)"), node("C(1)"), node("C(2)"), node("D(2)")]
        );
        assert!((route.time_mins() - 14.3).abs() < 1e-9);
    }

    #[test]
    fn source_equals_destination() {
        let graph = two_line_graph();
        let route = found(shortest_path(&graph, &node("B(1)"), &node("B(1)")).unwrap());

        assert_eq!(route.nodes(), &[node("B(1)")]);
        assert_eq!(route.time_mins(), 0.0);
        assert_eq!(route.distance_km(), 0.0);
    }

    #[test]
    fn unknown_endpoints_are_named() {
        let graph = two_line_graph();

        let err = shortest_path(&graph, &node("X(9)"), &node("A(1)")).unwrap_err();
        assert_eq!(err, QueryError::UnknownNode(node("X(9)")));

        let err = shortest_path(&graph, &node("A(1)"), &node("Y(9)")).unwrap_err();
        assert_eq!(err, QueryError::UnknownNode(node("Y(9)")));
    }

    #[test]
    fn disconnected_pair_is_unreachable() {
        let graph = graph_of(&[("A(1)", "B(1)", 1.0), ("C(1)", "D(1)", 1.0)]);
        let outcome = shortest_path(&graph, &node("A(1)"), &node("D(1)")).unwrap();
        assert!(outcome.is_unreachable());
    }

    #[test]
    fn picks_the_cheaper_of_two_routes() {
        let graph = graph_of(&[
            ("A(1)", "B(1)", 10.0),
            ("A(1)", "C(1)", 2.0),
            ("C(1)", "B(1)", 3.0),
        ]);
        let route = found(shortest_path(&graph, &node("A(1)"), &node("B(1)")).unwrap());
        assert_eq!(route.nodes(), &[node("A(1)"), node("C(1)"), node("B(1)")]);
        assert_eq!(route.time_mins(), 5.0);
    }

    #[test]
    fn equal_cost_tie_breaks_lexicographically() {
        // Two cost-2 paths A→D: via B and via C. B(1) < C(1), so the
        // reported path must go through B, every run.
        let graph = graph_of(&[
            ("A(1)", "B(1)", 1.0),
            ("A(1)", "C(1)", 1.0),
            ("B(1)", "D(1)", 1.0),
            ("C(1)", "D(1)", 1.0),
        ]);

        for _ in 0..10 {
            let route = found(shortest_path(&graph, &node("A(1)"), &node("D(1)")).unwrap());
            assert_eq!(route.nodes(), &[node("A(1)"), node("B(1)"), node("D(1)")]);
        }
    }

    #[test]
    fn route_cost_equals_sum_of_edge_weights() {
        let graph = two_line_graph();
        let route = found(shortest_path(&graph, &node("A(1)"), &node("D(2)")).unwrap());

        let mut sum = 0.0;
        for pair in route.nodes().windows(2) {
            sum += graph.weight(&pair[0], &pair[1]).unwrap().time_mins;
        }
        assert!((route.time_mins() - sum).abs() < 1e-9);
    }

    #[test]
    fn distance_accumulates_the_transfer_proxy() {
        let graph = two_line_graph();
        let route = found(shortest_path(&graph, &node("A(1)"), &node("D(2)")).unwrap());
        // 5 + 5 + 0.3 (transfer proxy) + 4
        assert!((route.distance_km() - 14.3).abs() < 1e-9);
    }

    #[test]
    fn cost_table_covers_every_node() {
        let graph = two_line_graph();
        let table = cost_table(&graph, &node("A(1)")).unwrap();

        assert_eq!(table.source(), &node("A(1)"));
        assert_eq!(table.cost(&node("A(1)")), Some(0.0));
        assert_eq!(table.cost(&node("B(1)")), Some(5.0));
        assert_eq!(table.cost(&node("C(1)")), Some(10.0));
        assert!((table.cost(&node("C(2)")).unwrap() - 10.3).abs() < 1e-9);
        assert!((table.cost(&node("D(2)")).unwrap() - 14.3).abs() < 1e-9);
    }

    #[test]
    fn cost_table_reports_unreachable_as_absent() {
        let graph = graph_of(&[("A(1)", "B(1)", 1.0), ("C(1)", "D(1)", 1.0)]);
        let table = cost_table(&graph, &node("A(1)")).unwrap();

        assert!(table.is_reachable(&node("B(1)")));
        assert!(!table.is_reachable(&node("C(1)")));
        assert_eq!(table.cost(&node("D(1)")), None);
        // Unknown nodes are also absent.
        assert_eq!(table.cost(&node("Z(1)")), None);
    }

    #[test]
    fn triangle_inequality() {
        let graph = graph_of(&[
            ("A(1)", "B(1)", 2.0),
            ("B(1)", "C(1)", 3.0),
            ("A(1)", "C(1)", 10.0),
        ]);
        let table = cost_table(&graph, &node("A(1)")).unwrap();

        let via = table.cost(&node("B(1)")).unwrap()
            + graph.weight(&node("B(1)"), &node("C(1)")).unwrap().time_mins;
        assert!(table.cost(&node("C(1)")).unwrap() <= via + 1e-9);
    }

    #[test]
    fn corrupt_table_is_a_fatal_error() {
        let graph = graph_of(&[("A(1)", "B(1)", 1.0), ("B(1)", "C(1)", 1.0)]);
        let mut table = cost_table(&graph, &node("A(1)")).unwrap();

        // Sever B's predecessor link; C's chain can no longer reach A.
        if let Some(label) = table.labels.get_mut(&node("B(1)")) {
            label.predecessor = None;
        }

        let err = reconstruct(&graph, &table, &node("C(1)")).unwrap_err();
        assert_eq!(
            err,
            QueryError::BrokenPredecessorChain { node: node("B(1)") }
        );
    }

    #[test]
    fn cyclic_chain_is_a_fatal_error() {
        let graph = graph_of(&[("A(1)", "B(1)", 1.0), ("B(1)", "C(1)", 1.0)]);
        let mut table = cost_table(&graph, &node("A(1)")).unwrap();

        // Point B and C at each other.
        if let Some(label) = table.labels.get_mut(&node("B(1)")) {
            label.predecessor = Some(node("C(1)"));
        }
        if let Some(label) = table.labels.get_mut(&node("C(1)")) {
            label.predecessor = Some(node("B(1)"));
        }

        let err = reconstruct(&graph, &table, &node("C(1)")).unwrap_err();
        assert!(matches!(err, QueryError::BrokenPredecessorChain { .. }));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = two_line_graph();
        let first = shortest_path(&graph, &node("A(1)"), &node("D(2)")).unwrap();
        for _ in 0..5 {
            let again = shortest_path(&graph, &node("A(1)"), &node("D(2)")).unwrap();
            assert_eq!(first, again);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::graph::{Converter, EdgeKind, GraphBuilder};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn node(i: usize) -> NodeId {
        NodeId::parse(&format!("S{i:02}(1)")).unwrap()
    }

    /// Random small graphs: up to 7 stations, each potential edge present
    /// with an integer weight so the oracle comparison is exact.
    fn arb_graph() -> impl Strategy<Value = Graph> {
        (2usize..=7)
            .prop_flat_map(|n| {
                let pair_count = n * (n - 1) / 2;
                (
                    Just(n),
                    proptest::collection::vec(proptest::option::of(1u32..=20), pair_count),
                )
            })
            .prop_map(|(n, weights)| {
                let mut builder = GraphBuilder::new(Converter::default());
                let mut k = 0;
                for i in 0..n {
                    for j in (i + 1)..n {
                        if let Some(w) = weights[k] {
                            builder = builder.weighted(
                                node(i),
                                node(j),
                                f64::from(w),
                                f64::from(w),
                                EdgeKind::Ride,
                            );
                        }
                        k += 1;
                    }
                }
                builder.build().unwrap()
            })
            .prop_filter("graph must have nodes", |g| g.node_count() >= 2)
    }

    /// Brute-force all-pairs reference.
    fn floyd_warshall(graph: &Graph) -> HashMap<(NodeId, NodeId), f64> {
        let nodes = graph.nodes();
        let mut dist = HashMap::new();
        for a in nodes {
            for b in nodes {
                let d = if a == b {
                    0.0
                } else {
                    graph
                        .weight(a, b)
                        .map_or(f64::INFINITY, |attrs| attrs.time_mins)
                };
                dist.insert((a.clone(), b.clone()), d);
            }
        }
        for k in nodes {
            for i in nodes {
                for j in nodes {
                    let via = dist[&(i.clone(), k.clone())] + dist[&(k.clone(), j.clone())];
                    if via < dist[&(i.clone(), j.clone())] {
                        dist.insert((i.clone(), j.clone()), via);
                    }
                }
            }
        }
        dist
    }

    proptest! {
        /// Engine costs agree with the brute-force reference for every pair,
        /// including unreachability.
        #[test]
        fn matches_reference_costs(graph in arb_graph()) {
            let reference = floyd_warshall(&graph);
            for source in graph.nodes() {
                let table = cost_table(&graph, source).unwrap();
                for target in graph.nodes() {
                    let expected = reference[&(source.clone(), target.clone())];
                    match table.cost(target) {
                        Some(cost) => prop_assert!((cost - expected).abs() < 1e-6),
                        None => prop_assert!(expected.is_infinite()),
                    }
                }
            }
        }

        /// Every returned path is edge-connected and its cost is exactly the
        /// sum of its edge weights.
        #[test]
        fn paths_are_connected_and_priced(graph in arb_graph()) {
            let nodes = graph.nodes().to_vec();
            let source = &nodes[0];
            for target in &nodes {
                let outcome = shortest_path(&graph, source, target).unwrap();
                if let RouteOutcome::Found(route) = outcome {
                    let mut sum = 0.0;
                    for pair in route.nodes().windows(2) {
                        let attrs = graph.weight(&pair[0], &pair[1]);
                        prop_assert!(attrs.is_some());
                        sum += attrs.map_or(0.0, |a| a.time_mins);
                    }
                    prop_assert!((route.time_mins() - sum).abs() < 1e-6);
                    prop_assert_eq!(route.source(), source);
                    prop_assert_eq!(route.destination(), target);
                }
            }
        }

        /// Identical inputs give identical outputs, tie-breaks included.
        #[test]
        fn deterministic(graph in arb_graph()) {
            let nodes = graph.nodes().to_vec();
            let (a, b) = (&nodes[0], &nodes[nodes.len() - 1]);
            let first = shortest_path(&graph, a, b).unwrap();
            let second = shortest_path(&graph, a, b).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
