//! Edge-list ingestion.
//!
//! The offline ETL pipeline hands over a header-less CSV of
//! `nodeA,nodeB,distance_km` rows, transfer edges included (rows whose
//! endpoints share a station name across different lines). This module turns
//! that file into a validated [`Graph`]. Any bad row aborts the whole load;
//! a partially loaded network is never served.

use std::path::Path;

use csv::StringRecord;
use tracing::info;

use super::{Converter, Graph, GraphBuilder};
use crate::domain::{InvalidEdge, NodeId};

/// Error loading the edge-list file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read or parsed as CSV.
    #[error("failed to read edge list: {0}")]
    Csv(#[from] csv::Error),

    /// A row had the wrong shape or an unparseable field.
    #[error("edge list line {line}: {reason}")]
    BadRecord { line: u64, reason: String },

    /// A row described an edge the graph rejects.
    #[error(transparent)]
    InvalidEdge(#[from] InvalidEdge),
}

/// Load a graph from the edge-list CSV at `path`.
///
/// Rows whose endpoints form a transfer pair become transfer edges with the
/// fixed penalty constants; the distance column of such rows (the ETL's
/// penalty-distance placeholder) is superseded. All other rows are ride
/// edges, converted from distance to minutes by `converter`.
pub fn load_graph(path: &Path, converter: Converter) -> Result<Graph, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut builder = GraphBuilder::new(converter);
    let mut rides = 0usize;
    let mut transfers = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != 3 {
            return Err(LoadError::BadRecord {
                line,
                reason: format!("expected 3 fields, got {}", record.len()),
            });
        }

        let a = parse_node(&record, 0, line)?;
        let b = parse_node(&record, 1, line)?;
        let distance_km: f64 = record[2].parse().map_err(|_| LoadError::BadRecord {
            line,
            reason: format!("distance is not a number: {:?}", &record[2]),
        })?;

        builder = if a.is_transfer_pair(&b) {
            transfers += 1;
            builder.transfer(a, b)
        } else {
            rides += 1;
            builder.ride(a, b, distance_km)
        };
    }

    let graph = builder.build()?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        rides,
        transfers,
        "loaded rail graph"
    );
    Ok(graph)
}

fn parse_node(record: &StringRecord, field: usize, line: u64) -> Result<NodeId, LoadError> {
    NodeId::parse(&record[field]).map_err(|e| LoadError::BadRecord {
        line,
        reason: format!("field {}: {}", field + 1, e),
    })
}
