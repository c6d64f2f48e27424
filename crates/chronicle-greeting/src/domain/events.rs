//! Domain events for the greeting context.

use chronicle_core::error::DomainError;
use chronicle_core::event::{DomainEvent, EventMetadata};
use chronicle_core::event_log::StoredEvent;
use serde::{Deserialize, Serialize};

/// Emitted once, when a greeter comes into existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeterCreated {
    /// The name the greeter introduces itself with.
    pub name: String,
}

/// Emitted every time a greeter greets someone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonGreeted {
    /// Who was greeted.
    pub person: String,
}

/// Event payload variants for the greeting context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GreeterEventKind {
    /// The greeter was created.
    GreeterCreated(GreeterCreated),
    /// The greeter greeted a person.
    PersonGreeted(PersonGreeted),
}

/// Domain event envelope for the greeting context.
#[derive(Debug, Clone, PartialEq)]
pub struct GreeterEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GreeterEventKind,
}

impl GreeterEventKind {
    /// The stored type name for this variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GreeterCreated(_) => "greeting.greeter_created",
            Self::PersonGreeted(_) => "greeting.person_greeted",
        }
    }
}

impl DomainEvent for GreeterEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GreeterEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn from_stored(stored: &StoredEvent) -> Result<Self, DomainError> {
        let kind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!(
                "event {} deserialization failed: {e}",
                stored.event_id
            ))
        })?;
        Ok(Self {
            metadata: EventMetadata::from_stored(stored),
            kind,
        })
    }
}
