//! Integration tests for `PgEventLog` and `LogEventStore` over `PostgreSQL`.
//!
//! These need a live database; run them with `DATABASE_URL` set and
//! `cargo test -- --ignored`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::event_log::{EventLog, StoredEvent};
use chronicle_core::identity::VersionedId;
use chronicle_core::store::EventStore;
use chronicle_event_store::log_store::LogEventStore;
use chronicle_event_store::pg_event_log::PgEventLog;
use chronicle_test_support::FakeAggregate;
use sqlx::PgPool;
use uuid::Uuid;

fn make_stored_event(aggregate_id: Uuid, sequence_number: i64) -> StoredEvent {
    // Postgres keeps microseconds; truncate so the round trip compares equal.
    let occurred_at =
        DateTime::<Utc>::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap_or_default();
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: "TestEvent".to_string(),
        payload: serde_json::json!({"key": "value"}),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at,
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_load_events_returns_empty_vec_for_nonexistent_aggregate(pool: PgPool) {
    let log = PgEventLog::new(pool);

    let events = log.load_events(Uuid::new_v4()).await.unwrap();

    assert!(events.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_append_and_load_single_event(pool: PgPool) {
    // Arrange
    let log = PgEventLog::new(pool);
    let aggregate_id = Uuid::new_v4();
    let event = make_stored_event(aggregate_id, 1);
    let expected = event.clone();

    // Act
    log.append_events(aggregate_id, 0, &[event]).await.unwrap();

    // Assert
    let loaded = log.load_events(aggregate_id).await.unwrap();
    assert_eq!(loaded, vec![expected]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_events_load_in_sequence_order_across_appends(pool: PgPool) {
    // Arrange
    let log = PgEventLog::new(pool);
    let aggregate_id = Uuid::new_v4();

    // Act
    log.append_events(
        aggregate_id,
        0,
        &[
            make_stored_event(aggregate_id, 1),
            make_stored_event(aggregate_id, 2),
        ],
    )
    .await
    .unwrap();
    log.append_events(aggregate_id, 2, &[make_stored_event(aggregate_id, 3)])
        .await
        .unwrap();

    // Assert
    let loaded = log.load_events(aggregate_id).await.unwrap();
    let sequence: Vec<i64> = loaded.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequence, vec![1, 2, 3]);
    assert_eq!(log.stream_version(aggregate_id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_stale_expected_version_returns_conflict(pool: PgPool) {
    // Arrange
    let log = PgEventLog::new(pool);
    let aggregate_id = Uuid::new_v4();
    log.append_events(aggregate_id, 0, &[make_stored_event(aggregate_id, 1)])
        .await
        .unwrap();

    // Act
    let result = log
        .append_events(aggregate_id, 0, &[make_stored_event(aggregate_id, 2)])
        .await;

    // Assert
    assert!(matches!(
        result,
        Err(DomainError::OptimisticLockingFailure {
            requested: 0,
            actual: 1,
            ..
        })
    ));
    assert_eq!(log.load_events(aggregate_id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_append_writes_nothing(pool: PgPool) {
    // Arrange
    let log = PgEventLog::new(pool);
    let aggregate_id = Uuid::new_v4();
    let duplicate = make_stored_event(aggregate_id, 1);
    let events = vec![duplicate.clone(), duplicate];

    // Act
    let result = log.append_events(aggregate_id, 0, &events).await;

    // Assert
    assert!(result.is_err());
    assert!(log.load_events(aggregate_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_log_store_round_trips_aggregate(pool: PgPool) {
    // Arrange
    let store = LogEventStore::new(Arc::new(PgEventLog::new(pool)));
    let id = Uuid::new_v4();
    let mut created = <FakeAggregate as AggregateRoot>::new(id);
    created.greet_person("Erik");
    created.greet_person("Sjors");

    // Act
    store.store_event_source(&created).await.unwrap();
    let loaded: Option<FakeAggregate> = store
        .load_event_source(VersionedId::new(id, 2))
        .await
        .unwrap();

    // Assert
    let loaded = loaded.unwrap();
    assert_eq!(loaded.version(), 2);
    assert_eq!(loaded.greeted(), vec!["Erik", "Sjors"]);
}
