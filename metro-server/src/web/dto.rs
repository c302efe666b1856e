//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{NodeId, Route};

/// Query parameters for the station listing.
#[derive(Debug, Deserialize)]
pub struct StationsQuery {
    /// Substring filter over full node identifiers.
    pub q: Option<String>,

    /// Maximum number of results (default 50, capped at 100).
    pub limit: Option<usize>,
}

/// A station node in responses.
#[derive(Debug, Serialize)]
pub struct StopResult {
    /// Full node identifier, e.g. `서울역(1)`.
    pub id: String,

    /// Station name without the line designator.
    pub station: String,

    /// Line designator, if the identifier carries one.
    pub line: Option<String>,
}

/// Response for the station listing.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// Matching stations, lexicographically ordered.
    pub stations: Vec<StopResult>,

    /// Number of matches before the limit was applied.
    pub total: usize,
}

/// Query parameters for a single shortest-path lookup.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin node identifier.
    pub from: String,

    /// Destination node identifier.
    pub to: String,
}

/// A computed route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Visited stations in travel order, endpoints included.
    pub stops: Vec<StopResult>,

    /// Number of visited stations.
    pub stop_count: usize,

    /// Total travel time in minutes.
    pub total_time_mins: f64,

    /// Total physical distance in kilometres.
    pub total_distance_km: f64,
}

/// Response for a single shortest-path lookup.
///
/// An unreachable destination is a normal response, not an HTTP error;
/// `found` is false and `reason` says why.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub found: bool,
    pub reason: Option<String>,
    pub route: Option<RouteResult>,
}

/// Request to find a meeting station.
#[derive(Debug, Deserialize)]
pub struct MeetRequest {
    /// Starting node identifiers, one per participant.
    pub sources: Vec<String>,
}

impl MeetRequest {
    pub const MIN_SOURCES: usize = 2;
    pub const MAX_SOURCES: usize = 5;

    /// Validate the participant count.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.sources.len();
        if n < Self::MIN_SOURCES || n > Self::MAX_SOURCES {
            return Err(format!(
                "expected between {} and {} sources, got {n}",
                Self::MIN_SOURCES,
                Self::MAX_SOURCES
            ));
        }
        Ok(())
    }
}

/// One participant's leg of a meeting.
#[derive(Debug, Serialize)]
pub struct ParticipantResult {
    /// Where this participant starts.
    pub source: StopResult,

    /// Their travel time to the meeting station, in minutes.
    pub time_mins: f64,

    /// Their individual route to the meeting station.
    pub route: RouteResult,
}

/// A chosen meeting station.
#[derive(Debug, Serialize)]
pub struct MeetingResult {
    /// The station minimizing the combined travel time.
    pub station: StopResult,

    /// Sum of all participants' travel times, in minutes.
    pub total_time_mins: f64,

    /// Per-participant breakdown, in request order.
    pub participants: Vec<ParticipantResult>,
}

/// Response for a meeting-point query.
#[derive(Debug, Serialize)]
pub struct MeetResponse {
    pub found: bool,
    pub reason: Option<String>,
    pub meeting: Option<MeetingResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

// Conversion implementations

impl StopResult {
    /// Create from a domain node.
    pub fn from_node(node: &NodeId) -> Self {
        Self {
            id: node.as_str().to_string(),
            station: node.station_name().to_string(),
            line: node.line().map(str::to_string),
        }
    }
}

impl RouteResult {
    /// Create from a domain route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            stops: route.nodes().iter().map(StopResult::from_node).collect(),
            stop_count: route.stop_count(),
            total_time_mins: route.time_mins(),
            total_distance_km: route.distance_km(),
        }
    }
}

impl RouteResponse {
    pub fn found(route: RouteResult) -> Self {
        Self {
            found: true,
            reason: None,
            route: Some(route),
        }
    }

    pub fn not_found(reason: String) -> Self {
        Self {
            found: false,
            reason: Some(reason),
            route: None,
        }
    }
}

impl MeetResponse {
    pub fn found(meeting: MeetingResult) -> Self {
        Self {
            found: true,
            reason: None,
            meeting: Some(meeting),
        }
    }

    pub fn not_found(reason: String) -> Self {
        Self {
            found: false,
            reason: Some(reason),
            meeting: None,
        }
    }
}
