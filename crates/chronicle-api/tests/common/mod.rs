//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use chronicle_bus::broadcast::BroadcastBus;
use chronicle_core::clock::Clock;
use chronicle_event_store::pg_event_log::PgEventLog;
use chronicle_test_support::FixedClock;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use chronicle_api::event_log::AppEventLog;
use chronicle_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

/// Build the full app router over a fresh in-memory event log.
pub fn build_in_memory_app() -> Router {
    chronicle_api::app(in_memory_state())
}

/// State over a fresh in-memory event log, for tests that issue several
/// requests against the same data.
pub fn in_memory_state() -> AppState {
    AppState::in_memory(BroadcastBus::new(64), fixed_clock())
}

/// Build the full app router with a real `PgEventLog`.
pub fn build_pg_app(pool: PgPool) -> Router {
    let log = AppEventLog::Postgres(PgEventLog::new(pool));
    chronicle_api::app(AppState::new(log, BroadcastBus::new(64), fixed_clock()))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
