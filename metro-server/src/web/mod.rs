//! Web layer for the route and meeting-point service.
//!
//! Provides JSON HTTP endpoints over the routing engine. The interactive
//! front-end consuming them lives elsewhere.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
