//! In-memory implementation of the `EventLog` trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use chronicle_core::error::DomainError;
use chronicle_core::event_log::{EventLog, StoredEvent};

/// Event log that keeps every stream in process memory.
///
/// Enforces the same expected-version rule as the `PostgreSQL` log, so it can
/// stand in for it in tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams with at least one event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn stream_count(&self) -> Result<usize, DomainError> {
        Ok(self.streams.read().map_err(|_| poisoned())?.len())
    }
}

fn poisoned() -> DomainError {
    DomainError::Infrastructure("in-memory event log lock poisoned".into())
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().map_err(|_| poisoned())?;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.streams.write().map_err(|_| poisoned())?;
        let actual = streams
            .get(&aggregate_id)
            .and_then(|stream| stream.last())
            .map_or(0, |e| e.sequence_number);
        if actual != expected_version {
            return Err(DomainError::OptimisticLockingFailure {
                aggregate_id,
                requested: expected_version,
                actual,
            });
        }

        streams
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        debug!(%aggregate_id, appended = events.len(), "appended events in memory");
        Ok(())
    }
}
