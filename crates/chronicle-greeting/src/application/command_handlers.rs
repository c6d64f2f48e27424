//! Command handlers for the greeting context.
//!
//! Each handler runs inside a unit of work: it reads or adds aggregates
//! through the session repository and leaves persistence to the flush.

use std::sync::Arc;

use async_trait::async_trait;
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use chronicle_core::event::DomainEvent;
use chronicle_core::identity::VersionedId;
use chronicle_core::repository::Repository;
use chronicle_core::store::EventStore;
use chronicle_core::unit_of_work::MessageHandler;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::aggregates::Greeter;
use crate::domain::commands::{CreateGreeter, GreetPerson};

/// What a greeting command hands back once handled.
#[derive(Debug, Clone, PartialEq)]
pub struct GreetingOutcome {
    /// The greeter at the version it reaches once this command is flushed.
    pub greeter: VersionedId,
    /// Events produced by this command.
    pub event_ids: Vec<Uuid>,
}

/// Handles `CreateGreeter` by adding a new `Greeter` to the session.
#[derive(Clone)]
pub struct CreateGreeterHandler {
    clock: Arc<dyn Clock>,
}

impl CreateGreeterHandler {
    /// Creates a handler stamping events with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<S: EventStore> MessageHandler<S> for CreateGreeterHandler {
    type Message = CreateGreeter;
    type Output = GreetingOutcome;

    #[instrument(skip_all, fields(greeter_id = %message.greeter_id))]
    async fn handle(
        &self,
        message: CreateGreeter,
        repository: &mut Repository<S>,
    ) -> Result<GreetingOutcome, DomainError> {
        let greeter = Greeter::create(
            message.greeter_id,
            &message.name,
            message.correlation_id,
            &*self.clock,
        )?;
        let greeter = repository.add(greeter)?;
        Ok(outcome(greeter, 0))
    }
}

/// Handles `GreetPerson` against the greeter at the requested version.
#[derive(Clone)]
pub struct GreetPersonHandler {
    clock: Arc<dyn Clock>,
}

impl GreetPersonHandler {
    /// Creates a handler stamping events with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<S: EventStore> MessageHandler<S> for GreetPersonHandler {
    type Message = GreetPerson;
    type Output = GreetingOutcome;

    #[instrument(skip_all, fields(greeter = %message.greeter))]
    async fn handle(
        &self,
        message: GreetPerson,
        repository: &mut Repository<S>,
    ) -> Result<GreetingOutcome, DomainError> {
        let greeter = repository.get::<Greeter>(message.greeter).await?;
        let before = greeter.unsaved_events().len();
        greeter.greet_person(&message.person, message.correlation_id, &*self.clock)?;
        Ok(outcome(greeter, before))
    }
}

fn outcome(greeter: &Greeter, produced_from: usize) -> GreetingOutcome {
    GreetingOutcome {
        greeter: greeter.versioned_id(),
        event_ids: greeter.unsaved_events()[produced_from..]
            .iter()
            .map(|e| e.metadata().event_id)
            .collect(),
    }
}
