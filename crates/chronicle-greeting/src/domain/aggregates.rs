//! Aggregate roots for the greeting context.

use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use chronicle_core::event::EventMetadata;
use chronicle_core::notification::Notification;
use uuid::Uuid;

use super::events::{GreeterCreated, GreeterEvent, GreeterEventKind, PersonGreeted};

/// Notification type carrying the text of a greeting back to the caller.
pub const GREETING_REPLY: &str = "greeting.reply";

/// The aggregate root for a greeter.
#[derive(Debug)]
pub struct Greeter {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Committed version (event count).
    pub(crate) version: i64,
    /// The name given at creation.
    pub(crate) name: String,
    /// Everyone greeted, in order.
    pub(crate) greeted: Vec<String>,
    /// Events pending persistence.
    unsaved_events: Vec<GreeterEvent>,
    /// Replies pending delivery.
    notifications: Vec<Notification>,
}

impl Greeter {
    /// Creates a greeter named `name`, producing a `GreeterCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn create(
        id: Uuid,
        name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("greeter name must not be empty".into()));
        }

        let mut greeter = <Self as AggregateRoot>::new(id);
        greeter.record(
            GreeterEventKind::GreeterCreated(GreeterCreated {
                name: name.to_owned(),
            }),
            correlation_id,
            clock,
        );
        Ok(greeter)
    }

    /// Greets `person`, producing a `PersonGreeted` event and a
    /// `greeting.reply` notification with the greeting text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `person` is blank.
    pub fn greet_person(
        &mut self,
        person: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let person = person.trim();
        if person.is_empty() {
            return Err(DomainError::Validation("person must not be empty".into()));
        }

        self.record(
            GreeterEventKind::PersonGreeted(PersonGreeted {
                person: person.to_owned(),
            }),
            correlation_id,
            clock,
        );
        self.notifications.push(Notification::new(
            GREETING_REPLY,
            self.id,
            correlation_id,
            serde_json::json!({
                "person": person,
                "greeting": format!("Hi {person}, I'm {}", self.current_name()),
            }),
        ));
        Ok(())
    }

    /// The greeter's name, taking unsaved events into account.
    #[must_use]
    pub fn current_name(&self) -> &str {
        self.unsaved_events
            .iter()
            .rev()
            .find_map(|e| match &e.kind {
                GreeterEventKind::GreeterCreated(created) => Some(created.name.as_str()),
                GreeterEventKind::PersonGreeted(_) => None,
            })
            .unwrap_or(self.name.as_str())
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.unsaved_events.len() as i64 + 1
    }

    fn record(&mut self, kind: GreeterEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = GreeterEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.unsaved_events.push(event);
    }
}

impl AggregateRoot for Greeter {
    type Event = GreeterEvent;

    fn aggregate_type() -> &'static str {
        "Greeter"
    }

    fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            name: String::new(),
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
        match &event.kind {
            GreeterEventKind::GreeterCreated(payload) => {
                self.name.clone_from(&payload.name);
            }
            GreeterEventKind::PersonGreeted(payload) => {
                self.greeted.push(payload.person.clone());
            }
        }
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
