//! Meeting-point aggregation across multiple starting stations.
//!
//! Runs one single-source search per participant, then scans every node for
//! the smallest sum of per-source costs. Nodes any participant cannot reach
//! are excluded; if that excludes everything, there is no common destination,
//! which is an expected outcome on a disconnected network, not an error.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{NodeId, QueryError};
use crate::engine::{self, CostTable};
use crate::graph::Graph;

/// A chosen meeting station with the evidence behind it.
#[derive(Debug, Clone)]
pub struct Meeting {
    station: NodeId,
    total_time_mins: f64,
    tables: Vec<Arc<CostTable>>,
}

impl Meeting {
    /// The station minimizing the participants' combined travel time.
    pub fn station(&self) -> &NodeId {
        &self.station
    }

    /// Sum of every participant's shortest time to the station, in minutes.
    pub fn total_time_mins(&self) -> f64 {
        self.total_time_mins
    }

    /// Per-source cost tables, in input order. Callers reconstruct each
    /// participant's route with `shortest_path(source, station)`.
    pub fn tables(&self) -> &[Arc<CostTable>] {
        &self.tables
    }
}

/// Outcome of a meeting-point query.
#[derive(Debug, Clone)]
pub enum MeetOutcome {
    /// Some station is reachable by everyone; here is the cheapest one.
    Found(Meeting),
    /// No station is reachable by every participant.
    NoCommonDestination,
}

impl MeetOutcome {
    pub fn meeting(&self) -> Option<&Meeting> {
        match self {
            MeetOutcome::Found(meeting) => Some(meeting),
            MeetOutcome::NoCommonDestination => None,
        }
    }

    pub fn is_no_common_destination(&self) -> bool {
        matches!(self, MeetOutcome::NoCommonDestination)
    }
}

/// Find the station minimizing the sum of shortest times from all `sources`.
///
/// Fails with [`QueryError::UnknownNode`] if any source is absent from the
/// graph. An empty source set has no meeting by definition.
pub fn meeting_point(graph: &Graph, sources: &[NodeId]) -> Result<MeetOutcome, QueryError> {
    let mut tables = Vec::with_capacity(sources.len());
    for source in sources {
        tables.push(Arc::new(engine::cost_table(graph, source)?));
    }
    Ok(select_meeting(graph, tables))
}

/// The aggregation core over already-computed per-source tables.
///
/// Split out so callers holding cached tables can feed them in directly.
/// Candidates are scanned in lexicographic node order with a strict `<`
/// comparison, so equal sums resolve to the smallest identifier, the same
/// determinism contract the engine itself honors.
pub fn select_meeting(graph: &Graph, tables: Vec<Arc<CostTable>>) -> MeetOutcome {
    if tables.is_empty() {
        return MeetOutcome::NoCommonDestination;
    }

    let mut best: Option<(f64, NodeId)> = None;
    let mut excluded = 0usize;

    for candidate in graph.nodes() {
        let mut total = 0.0;
        let mut reachable_by_all = true;
        for table in &tables {
            match table.cost(candidate) {
                Some(cost) => total += cost,
                None => {
                    reachable_by_all = false;
                    break;
                }
            }
        }
        if !reachable_by_all {
            excluded += 1;
            continue;
        }
        if best.as_ref().is_none_or(|(current, _)| total < *current) {
            best = Some((total, candidate.clone()));
        }
    }

    debug!(
        candidates = graph.node_count(),
        excluded, "meeting-point scan complete"
    );

    match best {
        Some((total_time_mins, station)) => MeetOutcome::Found(Meeting {
            station,
            total_time_mins,
            tables,
        }),
        None => MeetOutcome::NoCommonDestination,
    }
}
