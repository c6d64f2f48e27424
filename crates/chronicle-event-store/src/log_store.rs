//! `EventStore` that keeps aggregates as streams in an `EventLog`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::event::DomainEvent;
use chronicle_core::event_log::{EventLog, StoredEvent};
use chronicle_core::identity::VersionedId;
use chronicle_core::store::EventStore;

/// Event-sourcing store over an append-only log.
///
/// Loading replays the stream onto a fresh aggregate; storing appends the
/// unsaved events with the committed version as the expected stream head.
#[derive(Debug)]
pub struct LogEventStore<L> {
    log: Arc<L>,
}

impl<L> Clone for LogEventStore<L> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<L: EventLog + 'static> LogEventStore<L> {
    /// Creates a store writing to `log`.
    #[must_use]
    pub fn new(log: Arc<L>) -> Self {
        Self { log }
    }

    /// The underlying log.
    #[must_use]
    pub fn log(&self) -> &Arc<L> {
        &self.log
    }
}

#[async_trait]
impl<L: EventLog + 'static> EventStore for LogEventStore<L> {
    #[instrument(skip_all, fields(aggregate_type = A::aggregate_type(), id = %id))]
    async fn load_event_source<A: AggregateRoot>(
        &self,
        id: VersionedId,
    ) -> Result<Option<A>, DomainError> {
        let stored = self.log.load_events(id.id).await?;
        if stored.is_empty() {
            return Ok(None);
        }

        let history = stored
            .iter()
            .map(<A::Event as DomainEvent>::from_stored)
            .collect::<Result<Vec<_>, _>>()?;

        let mut aggregate = A::new(id.id);
        aggregate.load_from_history(&history);
        debug!(replayed = history.len(), "rebuilt aggregate from log");
        Ok(Some(aggregate))
    }

    #[instrument(
        skip_all,
        fields(aggregate_type = A::aggregate_type(), aggregate_id = %aggregate.aggregate_id())
    )]
    async fn store_event_source<A: AggregateRoot>(
        &self,
        aggregate: &A,
    ) -> Result<(), DomainError> {
        let events: Vec<StoredEvent> = aggregate
            .unsaved_events()
            .iter()
            .map(<A::Event as DomainEvent>::to_stored)
            .collect();
        if events.is_empty() {
            return Ok(());
        }

        self.log
            .append_events(aggregate.aggregate_id(), aggregate.version(), &events)
            .await?;
        debug!(appended = events.len(), "stored aggregate events");
        Ok(())
    }
}
