//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use futures::future::join_all;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{NodeId, QueryError, RouteOutcome};
use crate::meet::MeetOutcome;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/route", get(find_route))
        .route("/meet", post(find_meeting))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List station nodes, optionally filtered by identifier substring.
async fn list_stations(
    State(state): State<AppState>,
    Query(req): Query<StationsQuery>,
) -> Json<StationsResponse> {
    let limit = req.limit.unwrap_or(50).min(100);
    let graph = state.router.graph();

    let matches: Vec<&NodeId> = graph
        .nodes()
        .iter()
        .filter(|n| req.q.as_deref().is_none_or(|q| n.as_str().contains(q)))
        .collect();
    let total = matches.len();

    let stations = matches
        .into_iter()
        .take(limit)
        .map(StopResult::from_node)
        .collect();

    Json(StationsResponse { stations, total })
}

/// Compute the minimum-time route between two stations.
async fn find_route(
    State(state): State<AppState>,
    Query(req): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let from = parse_node(&req.from, "origin")?;
    let to = parse_node(&req.to, "destination")?;

    let outcome = state.router.shortest_path(&from, &to)?;

    let response = match outcome {
        RouteOutcome::Found(route) => RouteResponse::found(RouteResult::from_route(&route)),
        RouteOutcome::Unreachable => {
            RouteResponse::not_found(format!("no rail path connects {from} to {to}"))
        }
    };
    Ok(Json(response))
}

/// Find the station minimizing the participants' combined travel time.
async fn find_meeting(
    State(state): State<AppState>,
    Json(req): Json<MeetRequest>,
) -> Result<Json<MeetResponse>, AppError> {
    req.validate()
        .map_err(|message| AppError::BadRequest { message })?;

    let mut sources = Vec::with_capacity(req.sources.len());
    for raw in &req.sources {
        sources.push(parse_node(raw, "source")?);
    }

    // Each source's table is an independent CPU-bound search; warm the
    // cache for all of them concurrently off the async runtime.
    let table_tasks: Vec<_> = sources
        .iter()
        .map(|source| {
            let router = state.router.clone();
            let source = source.clone();
            tokio::task::spawn_blocking(move || router.cost_table(&source))
        })
        .collect();
    for joined in join_all(table_tasks).await {
        joined.map_err(|e| AppError::Internal {
            message: format!("cost-table task failed: {e}"),
        })??;
    }

    let outcome = state.router.meeting_point(&sources)?;

    let response = match outcome {
        MeetOutcome::Found(meeting) => {
            let mut participants = Vec::with_capacity(sources.len());
            for source in &sources {
                let outcome = state.router.shortest_path(source, meeting.station())?;
                let Some(route) = outcome.route() else {
                    // The chosen station is reachable by every source by
                    // construction; anything else is engine corruption.
                    return Err(AppError::Internal {
                        message: format!(
                            "meeting station {} unreachable from source {}",
                            meeting.station(),
                            source
                        ),
                    });
                };
                participants.push(ParticipantResult {
                    source: StopResult::from_node(source),
                    time_mins: route.time_mins(),
                    route: RouteResult::from_route(route),
                });
            }
            MeetResponse::found(MeetingResult {
                station: StopResult::from_node(meeting.station()),
                total_time_mins: meeting.total_time_mins(),
                participants,
            })
        }
        MeetOutcome::NoCommonDestination => {
            MeetResponse::not_found("no station is reachable from every source".to_string())
        }
    };
    Ok(Json(response))
}

/// Parse a node identifier from request input, naming its role on failure.
fn parse_node(raw: &str, role: &str) -> Result<NodeId, AppError> {
    NodeId::parse(raw).map_err(|e| AppError::BadRequest {
        message: format!("invalid {role} station {raw:?}: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::UnknownNode(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            QueryError::BrokenPredecessorChain { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
