//! Chronicle HTTP API.
//!
//! Every command request runs as one unit of work: a fresh repository
//! session, a handler, and a flush that stores events, publishes them on the
//! shared bus and collects the replies returned in the response.

pub mod config;
pub mod error;
pub mod event_log;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/greeters", routes::greeters::router())
        .with_state(state)
}
