//! Fake aggregate: a minimal `AggregateRoot` for repository and store tests.

use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use chronicle_core::event::{DomainEvent, EventMetadata};
use chronicle_core::event_log::StoredEvent;
use chronicle_core::notification::Notification;
use uuid::Uuid;

use crate::clock::FixedClock;

/// The single event a `FakeAggregate` knows: someone was greeted.
#[derive(Debug, Clone, PartialEq)]
pub struct GreetingEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Who was greeted.
    pub person: String,
}

impl GreetingEvent {
    /// Builds a greeting event at the given stream position.
    #[must_use]
    pub fn new(aggregate_id: Uuid, sequence_number: i64, person: impl Into<String>) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: "fake.greeted".to_owned(),
                aggregate_id,
                sequence_number,
                correlation_id: Uuid::nil(),
                causation_id: Uuid::nil(),
                occurred_at: FixedClock::default().now(),
            },
            person: person.into(),
        }
    }
}

impl DomainEvent for GreetingEvent {
    fn event_type(&self) -> &'static str {
        "fake.greeted"
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "person": self.person })
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn from_stored(stored: &StoredEvent) -> Result<Self, DomainError> {
        let person = stored
            .payload
            .get("person")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                DomainError::Infrastructure(format!(
                    "event {} has no person field",
                    stored.event_id
                ))
            })?;
        Ok(Self {
            metadata: EventMetadata::from_stored(stored),
            person: person.to_owned(),
        })
    }
}

/// Aggregate that records who it greeted.
#[derive(Debug)]
pub struct FakeAggregate {
    id: Uuid,
    version: i64,
    greeted: Vec<String>,
    unsaved_events: Vec<GreetingEvent>,
    notifications: Vec<Notification>,
}

impl FakeAggregate {
    /// Creates an aggregate whose history already holds one greeting per
    /// entry of `people`.
    #[must_use]
    pub fn with_history(id: Uuid, people: &[&str]) -> Self {
        let mut aggregate = <Self as AggregateRoot>::new(id);
        let history: Vec<GreetingEvent> = people
            .iter()
            .zip(1..)
            .map(|(person, sequence)| GreetingEvent::new(id, sequence, *person))
            .collect();
        aggregate.load_from_history(&history);
        aggregate
    }

    /// Greets `person`: one unsaved event plus a reply notification.
    pub fn greet_person(&mut self, person: &str) {
        let event = GreetingEvent::new(self.id, self.versioned_id().version + 1, person);
        self.notifications.push(Notification::new(
            "fake.greeting",
            self.id,
            Uuid::nil(),
            serde_json::json!({ "message": format!("Hi {person}") }),
        ));
        self.unsaved_events.push(event);
    }

    /// Greets `person` without replying: one unsaved event, no notification.
    pub fn greet_silently(&mut self, person: &str) {
        let event = GreetingEvent::new(self.id, self.versioned_id().version + 1, person);
        self.unsaved_events.push(event);
    }

    /// Queues a notification without producing an event.
    pub fn notify(&mut self, message: &str) {
        self.notifications.push(Notification::new(
            "fake.notice",
            self.id,
            Uuid::nil(),
            serde_json::json!({ "message": message }),
        ));
    }

    /// Everyone greeted so far, replayed or not yet saved.
    #[must_use]
    pub fn greeted(&self) -> Vec<String> {
        self.greeted
            .iter()
            .cloned()
            .chain(self.unsaved_events.iter().map(|e| e.person.clone()))
            .collect()
    }
}

impl AggregateRoot for FakeAggregate {
    type Event = GreetingEvent;

    fn aggregate_type() -> &'static str {
        "FakeAggregate"
    }

    fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            greeted: Vec::new(),
            unsaved_events: Vec::new(),
            notifications: Vec::new(),
        }
    }

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.greeted.push(event.person.clone());
        self.version += 1;
    }

    fn unsaved_events(&self) -> &[Self::Event] {
        &self.unsaved_events
    }

    fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    fn mark_committed(&mut self) {
        for event in std::mem::take(&mut self.unsaved_events) {
            self.apply(&event);
        }
        self.notifications.clear();
    }
}
