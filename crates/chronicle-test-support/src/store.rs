//! Recording event store: an in-memory `EventStore` that logs every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::event::DomainEvent;
use chronicle_core::event_log::StoredEvent;
use chronicle_core::identity::VersionedId;
use chronicle_core::store::{EventStore, check_version};
use uuid::Uuid;

use crate::call_log::{Call, CallLog};

/// An event store backed by a map of event streams that records every
/// `load_event_source`, `verify_version` and `store_event_source` call into
/// a [`CallLog`].
///
/// Version checks follow the production policy unless a conflict has been
/// scripted with [`RecordingEventStore::conflict_on_verify`].
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
    scripted_conflicts: Mutex<Vec<VersionedId>>,
    log: CallLog,
}

impl RecordingEventStore {
    /// Creates an empty store with its own call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store recording into a shared call log.
    #[must_use]
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Seeds the stream of `aggregate_id` with `events`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed<E: DomainEvent>(&self, aggregate_id: Uuid, events: &[E]) {
        self.streams
            .lock()
            .unwrap()
            .entry(aggregate_id)
            .or_default()
            .extend(events.iter().map(DomainEvent::to_stored));
    }

    /// Makes the next `verify_version` for exactly `requested` fail with an
    /// optimistic locking error.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn conflict_on_verify(&self, requested: VersionedId) {
        self.scripted_conflicts.lock().unwrap().push(requested);
    }

    /// Returns the persisted stream of `aggregate_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stream(&self, aggregate_id: Uuid) -> Vec<StoredEvent> {
        self.streams
            .lock()
            .unwrap()
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the call log this store records into.
    #[must_use]
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Number of `load_event_source` calls made for `aggregate_id`.
    #[must_use]
    pub fn load_count(&self, aggregate_id: Uuid) -> usize {
        self.calls_matching(|call| *call == Call::Load(aggregate_id))
    }

    /// Number of `store_event_source` calls made for `aggregate_id`.
    #[must_use]
    pub fn store_count(&self, aggregate_id: Uuid) -> usize {
        self.calls_matching(|call| matches!(call, Call::Store(id, _) if *id == aggregate_id))
    }

    fn calls_matching(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.log.calls().iter().filter(|call| predicate(call)).count()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn load_event_source<A: AggregateRoot>(
        &self,
        id: VersionedId,
    ) -> Result<Option<A>, DomainError> {
        self.log.record(Call::Load(id.id));
        let stored = self.stream(id.id);
        if stored.is_empty() {
            return Ok(None);
        }

        let events = stored
            .iter()
            .map(<A::Event as DomainEvent>::from_stored)
            .collect::<Result<Vec<_>, _>>()?;
        let mut aggregate = A::new(id.id);
        aggregate.load_from_history(&events);
        Ok(Some(aggregate))
    }

    async fn store_event_source<A: AggregateRoot>(
        &self,
        aggregate: &A,
    ) -> Result<(), DomainError> {
        let aggregate_id = aggregate.aggregate_id();
        let unsaved = aggregate.unsaved_events();
        self.log.record(Call::Store(aggregate_id, unsaved.len()));

        let mut streams = self.streams.lock().unwrap();
        let stream = streams.entry(aggregate_id).or_default();
        let actual = stream.last().map_or(0, |e| e.sequence_number);
        if actual != aggregate.version() {
            return Err(DomainError::OptimisticLockingFailure {
                aggregate_id,
                requested: aggregate.version(),
                actual,
            });
        }
        stream.extend(unsaved.iter().map(DomainEvent::to_stored));
        Ok(())
    }

    async fn verify_version<A: AggregateRoot>(
        &self,
        aggregate: &A,
        requested: VersionedId,
    ) -> Result<(), DomainError> {
        self.log.record(Call::Verify(requested.id, requested.version));

        let mut scripted = self.scripted_conflicts.lock().unwrap();
        if let Some(index) = scripted.iter().position(|id| *id == requested) {
            scripted.remove(index);
            return Err(DomainError::OptimisticLockingFailure {
                aggregate_id: requested.id,
                requested: requested.version,
                actual: aggregate.versioned_id().version,
            });
        }
        drop(scripted);

        check_version(aggregate, requested)
    }
}
