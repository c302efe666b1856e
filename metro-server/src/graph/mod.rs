//! The immutable rail network graph.
//!
//! Nodes are station-line identifiers; edges are undirected and weighted in
//! minutes. Ride edges derive their weight from physical distance via the
//! converter; transfer edges between same-station/different-line nodes carry
//! a fixed penalty. The graph is built once, validated as a whole, and shared
//! read-only for the lifetime of the process; there is no global mutable
//! lookup state anywhere.

mod convert;
mod load;

pub use convert::{
    Converter, DEFAULT_AVG_SPEED_KMH, TRANSFER_DISTANCE_KM, TRANSFER_TIME_MINS,
};
pub use load::{LoadError, load_graph};

use std::collections::HashMap;

use crate::domain::{InvalidEdge, NodeId};

/// The two kinds of connection in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// A ride between two consecutive stations on the same line.
    Ride,
    /// A line change within the same physical station.
    Transfer,
}

/// Weight and bookkeeping attributes of one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAttrs {
    /// Travel time in minutes. Always positive.
    pub time_mins: f64,
    /// Physical distance in kilometres (fixed proxy for transfers).
    pub distance_km: f64,
    pub kind: EdgeKind,
}

/// An immutable, undirected, weighted station graph.
///
/// Node identifiers are held in lexicographic order; the shortest-path
/// engine's deterministic tie-break leans on that ordering. Edges are stored
/// symmetrically, so `weight(a, b)` and `weight(b, a)` always agree.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<NodeId>,
    adjacency: HashMap<NodeId, Vec<(NodeId, EdgeAttrs)>>,
    edge_count: usize,
}

impl Graph {
    /// All nodes, lexicographically sorted.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Adjacent nodes with their edge attributes, lexicographically ordered.
    ///
    /// Unknown nodes have no neighbors.
    pub fn neighbors(&self, node: &NodeId) -> &[(NodeId, EdgeAttrs)] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Edge attributes between two nodes, if an edge exists.
    pub fn weight(&self, a: &NodeId, b: &NodeId) -> Option<&EdgeAttrs> {
        self.neighbors(a)
            .iter()
            .find(|(neighbor, _)| neighbor == b)
            .map(|(_, attrs)| attrs)
    }
}

/// Accumulates edges and validates them into a [`Graph`].
///
/// Duplicate edges between the same node pair collapse to the smaller time
/// weight. Validation happens in [`build`](GraphBuilder::build); any bad edge
/// fails the whole construction.
#[derive(Debug)]
pub struct GraphBuilder {
    converter: Converter,
    edges: Vec<(NodeId, NodeId, EdgeAttrs)>,
}

impl GraphBuilder {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter,
            edges: Vec::new(),
        }
    }

    /// Add a ride edge from its physical distance; the converter supplies
    /// the time weight.
    pub fn ride(mut self, a: NodeId, b: NodeId, distance_km: f64) -> Self {
        let attrs = EdgeAttrs {
            time_mins: self.converter.ride_time_mins(distance_km),
            distance_km,
            kind: EdgeKind::Ride,
        };
        self.edges.push((a, b, attrs));
        self
    }

    /// Add a transfer edge carrying the fixed penalty constants.
    pub fn transfer(mut self, a: NodeId, b: NodeId) -> Self {
        let attrs = EdgeAttrs {
            time_mins: TRANSFER_TIME_MINS,
            distance_km: TRANSFER_DISTANCE_KM,
            kind: EdgeKind::Transfer,
        };
        self.edges.push((a, b, attrs));
        self
    }

    /// Add an edge with an explicit time weight.
    ///
    /// This is the raw `(a, b, weight)` triple form; `ride` and `transfer`
    /// are the usual entry points when building from network data.
    pub fn weighted(
        mut self,
        a: NodeId,
        b: NodeId,
        time_mins: f64,
        distance_km: f64,
        kind: EdgeKind,
    ) -> Self {
        let attrs = EdgeAttrs {
            time_mins,
            distance_km,
            kind,
        };
        self.edges.push((a, b, attrs));
        self
    }

    /// Validate every accumulated edge and assemble the graph.
    pub fn build(self) -> Result<Graph, InvalidEdge> {
        let mut deduped: HashMap<(NodeId, NodeId), EdgeAttrs> = HashMap::new();

        for (a, b, attrs) in self.edges {
            if a == b {
                return Err(InvalidEdge::new(a, b, "self-loops are not allowed"));
            }
            if !attrs.time_mins.is_finite() || attrs.time_mins <= 0.0 {
                return Err(InvalidEdge::new(
                    a,
                    b,
                    format!("time weight must be positive, got {}", attrs.time_mins),
                ));
            }
            if !attrs.distance_km.is_finite() || attrs.distance_km <= 0.0 {
                return Err(InvalidEdge::new(
                    a,
                    b,
                    format!("distance must be positive, got {}", attrs.distance_km),
                ));
            }

            // Undirected: normalize the pair so A-B and B-A dedup together.
            let key = if a <= b { (a, b) } else { (b, a) };
            deduped
                .entry(key)
                .and_modify(|existing| {
                    if attrs.time_mins < existing.time_mins {
                        *existing = attrs;
                    }
                })
                .or_insert(attrs);
        }

        let edge_count = deduped.len();
        let mut adjacency: HashMap<NodeId, Vec<(NodeId, EdgeAttrs)>> = HashMap::new();
        for ((a, b), attrs) in deduped {
            adjacency
                .entry(a.clone())
                .or_default()
                .push((b.clone(), attrs));
            adjacency.entry(b).or_default().push((a, attrs));
        }
        for neighbors in adjacency.values_mut() {
            neighbors.sort_by(|(x, _), (y, _)| x.cmp(y));
        }

        let mut nodes: Vec<NodeId> = adjacency.keys().cloned().collect();
        nodes.sort();

        Ok(Graph {
            nodes,
            adjacency,
            edge_count,
        })
    }
}
