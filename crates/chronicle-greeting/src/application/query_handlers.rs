//! Query handlers for the greeting context.
//!
//! Queries read straight from the event store and bypass the unit of work,
//! since nothing they load is ever flushed.

use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::identity::VersionedId;
use chronicle_core::store::EventStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Greeter;

/// Read-only view of a greeter aggregate.
#[derive(Debug, Serialize)]
pub struct GreeterView {
    /// The greeter identifier.
    pub greeter_id: Uuid,
    /// The greeter's name.
    pub name: String,
    /// Everyone greeted, in order.
    pub greeted: Vec<String>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a greeter by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateRootNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_greeter_by_id<S: EventStore>(
    greeter_id: Uuid,
    store: &S,
) -> Result<GreeterView, DomainError> {
    let greeter: Greeter = store
        .load_event_source(VersionedId::for_id(greeter_id))
        .await?
        .ok_or(DomainError::AggregateRootNotFound {
            aggregate_type: Greeter::aggregate_type(),
            aggregate_id: greeter_id,
        })?;
    Ok(GreeterView {
        greeter_id,
        version: greeter.version(),
        name: greeter.name,
        greeted: greeter.greeted,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use chronicle_core::error::DomainError;
    use chronicle_core::event_log::StoredEvent;
    use chronicle_event_store::log_store::LogEventStore;
    use uuid::Uuid;

    use crate::application::query_handlers::get_greeter_by_id;
    use crate::domain::events::{GreeterCreated, GreeterEventKind, PersonGreeted};
    use chronicle_test_support::{EmptyEventLog, RecordingEventLog};

    fn stored(greeter_id: Uuid, sequence_number: i64, kind: &GreeterEventKind) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: greeter_id,
            event_type: kind.event_type().to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_greeter_by_id_returns_view_with_state() {
        // Arrange
        let greeter_id = Uuid::new_v4();
        let events = vec![
            stored(
                greeter_id,
                1,
                &GreeterEventKind::GreeterCreated(GreeterCreated {
                    name: "Ada".to_owned(),
                }),
            ),
            stored(
                greeter_id,
                2,
                &GreeterEventKind::PersonGreeted(PersonGreeted {
                    person: "Erik".to_owned(),
                }),
            ),
        ];
        let store = LogEventStore::new(Arc::new(RecordingEventLog::new(events)));

        // Act
        let view = get_greeter_by_id(greeter_id, &store).await.unwrap();

        // Assert
        assert_eq!(view.greeter_id, greeter_id);
        assert_eq!(view.name, "Ada");
        assert_eq!(view.greeted, vec!["Erik"]);
        assert_eq!(view.version, 2);
    }

    #[tokio::test]
    async fn test_get_greeter_by_id_returns_not_found_when_no_events() {
        // Arrange
        let greeter_id = Uuid::new_v4();
        let store = LogEventStore::new(Arc::new(EmptyEventLog));

        // Act
        let result = get_greeter_by_id(greeter_id, &store).await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateRootNotFound {
                aggregate_type,
                aggregate_id,
            } => {
                assert_eq!(aggregate_type, "Greeter");
                assert_eq!(aggregate_id, greeter_id);
            }
            other => panic!("expected AggregateRootNotFound, got {other:?}"),
        }
    }
}
