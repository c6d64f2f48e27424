//! Integration tests for the greeting bounded context.

mod common;

use axum::http::StatusCode;
use chronicle_core::event_log::EventLog;
use sqlx::PgPool;
use uuid::Uuid;

#[tokio::test]
async fn test_greeter_round_trip_in_memory() {
    let state = common::in_memory_state();

    // POST /api/v1/greeters
    let (status, json) = common::post_json(
        chronicle_api::app(state.clone()),
        "/api/v1/greeters",
        &serde_json::json!({ "name": "Ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let greeter_id = json["greeter_id"].as_str().unwrap().to_owned();

    // POST /api/v1/greeters/greet, twice, each at the version returned before
    let mut version = json["version"].as_i64().unwrap();
    for person in ["Erik", "Sjors"] {
        let (status, json) = common::post_json(
            chronicle_api::app(state.clone()),
            "/api/v1/greeters/greet",
            &serde_json::json!({ "greeter_id": greeter_id, "version": version, "person": person }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["replies"][0]["payload"]["greeting"], format!("Hi {person}, I'm Ada"));
        version = json["version"].as_i64().unwrap();
    }

    // GET /api/v1/greeters/{greeter_id}: verify persisted state
    let (status, json) = common::get_json(
        chronicle_api::app(state),
        &format!("/api/v1/greeters/{greeter_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 3);
    assert_eq!(json["greeted"], serde_json::json!(["Erik", "Sjors"]));
}

#[tokio::test]
async fn test_recorded_events_carry_the_state_clock_timestamp() {
    // Arrange
    let state = common::in_memory_state();
    let (_, json) = common::post_json(
        chronicle_api::app(state.clone()),
        "/api/v1/greeters",
        &serde_json::json!({ "name": "Ada" }),
    )
    .await;
    let greeter_id: Uuid = json["greeter_id"].as_str().unwrap().parse().unwrap();

    // Act
    let events = state.store.log().load_events(greeter_id).await.unwrap();

    // Assert
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].occurred_at, common::fixed_now());
}

#[tokio::test]
async fn test_get_nonexistent_greeter_returns_404() {
    let app = common::build_in_memory_app();

    let (status, json) =
        common::get_json(app, &format!("/api/v1/greeters/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_greeter_round_trip_postgres(pool: PgPool) {
    let (status, json) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/greeters",
        &serde_json::json!({ "name": "Ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let greeter_id = json["greeter_id"].as_str().unwrap().to_owned();

    let (status, _) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/greeters/greet",
        &serde_json::json!({ "greeter_id": greeter_id, "version": 1, "person": "Erik" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A second caller still holding version 0 conflicts.
    let (status, json) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/greeters/greet",
        &serde_json::json!({ "greeter_id": greeter_id, "version": 0, "person": "Sjors" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "optimistic_locking_failure");

    let (status, json) = common::get_json(
        common::build_pg_app(pool),
        &format!("/api/v1/greeters/{greeter_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], 2);
}
