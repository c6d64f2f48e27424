//! Tests for `handle_message`: flush on success, discard on failure.

use std::sync::Arc;

use async_trait::async_trait;
use chronicle_core::error::DomainError;
use chronicle_core::identity::VersionedId;
use chronicle_core::message::Message;
use chronicle_core::repository::Repository;
use chronicle_core::unit_of_work::{MessageHandler, handle_message};
use chronicle_test_support::{FakeAggregate, GreetingEvent, RecordingBus, RecordingEventStore};
use uuid::Uuid;

#[derive(Debug)]
struct Greet {
    target: VersionedId,
    person: &'static str,
    fail_after_greeting: bool,
}

impl Message for Greet {
    fn message_type(&self) -> &'static str {
        "test.greet"
    }

    fn correlation_id(&self) -> Uuid {
        Uuid::nil()
    }
}

struct GreetHandler;

#[async_trait]
impl MessageHandler<RecordingEventStore> for GreetHandler {
    type Message = Greet;
    type Output = usize;

    async fn handle(
        &self,
        message: Greet,
        repository: &mut Repository<RecordingEventStore>,
    ) -> Result<usize, DomainError> {
        let aggregate = repository.get::<FakeAggregate>(message.target).await?;
        aggregate.greet_person(message.person);
        if message.fail_after_greeting {
            return Err(DomainError::Validation("greeting rejected".into()));
        }
        Ok(aggregate.greeted().len())
    }
}

fn seeded_store() -> (VersionedId, Arc<RecordingEventStore>) {
    let id = VersionedId::random().with_version(1);
    let store = Arc::new(RecordingEventStore::new());
    store.seed(id.id, &[GreetingEvent::new(id.id, 1, "Erik")]);
    (id, store)
}

#[tokio::test]
async fn test_handle_message_flushes_after_successful_handler() {
    // Arrange
    let (id, store) = seeded_store();
    let bus = Arc::new(RecordingBus::new());
    let message = Greet {
        target: id,
        person: "Sjors",
        fail_after_greeting: false,
    };

    // Act
    let handled = handle_message(store.clone(), bus.clone(), &GreetHandler, message)
        .await
        .unwrap();

    // Assert
    assert_eq!(handled.output, 2);
    assert_eq!(handled.report.aggregates, 1);
    assert_eq!(store.stream(id.id).len(), 2);
    assert_eq!(bus.published().len(), 1);
    assert_eq!(bus.replied().len(), 1);
}

#[tokio::test]
async fn test_handle_message_discards_session_when_handler_fails() {
    // Arrange
    let (id, store) = seeded_store();
    let bus = Arc::new(RecordingBus::new());
    let message = Greet {
        target: id,
        person: "Sjors",
        fail_after_greeting: true,
    };

    // Act
    let result = handle_message(store.clone(), bus.clone(), &GreetHandler, message).await;

    // Assert
    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(store.store_count(id.id), 0);
    assert_eq!(store.stream(id.id).len(), 1);
    assert!(bus.published().is_empty());
    assert!(bus.replied().is_empty());
}

#[tokio::test]
async fn test_handle_message_surfaces_not_found_without_flushing() {
    // Arrange
    let (_, store) = seeded_store();
    let bus = Arc::new(RecordingBus::new());
    let missing = VersionedId::random();
    let message = Greet {
        target: missing,
        person: "Sjors",
        fail_after_greeting: false,
    };

    // Act
    let result = handle_message(store.clone(), bus.clone(), &GreetHandler, message).await;

    // Assert
    assert!(matches!(
        result,
        Err(DomainError::AggregateRootNotFound { aggregate_id, .. }) if aggregate_id == missing.id
    ));
    assert!(bus.replied().is_empty());
}
