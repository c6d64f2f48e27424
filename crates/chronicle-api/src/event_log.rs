//! Event log selected at startup.

use async_trait::async_trait;
use chronicle_core::error::DomainError;
use chronicle_core::event_log::{EventLog, StoredEvent};
use chronicle_event_store::in_memory_event_log::InMemoryEventLog;
use chronicle_event_store::pg_event_log::PgEventLog;
use uuid::Uuid;

/// The event log backing the server: `PostgreSQL` when a database is
/// configured, process memory otherwise.
#[derive(Debug)]
pub enum AppEventLog {
    /// Events kept in process memory; lost on restart.
    InMemory(InMemoryEventLog),
    /// Events kept in the `domain_events` table.
    Postgres(PgEventLog),
}

impl AppEventLog {
    /// Short name of the backing medium, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "in-memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

#[async_trait]
impl EventLog for AppEventLog {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        match self {
            Self::InMemory(log) => log.load_events(aggregate_id).await,
            Self::Postgres(log) => log.load_events(aggregate_id).await,
        }
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        match self {
            Self::InMemory(log) => {
                log.append_events(aggregate_id, expected_version, events)
                    .await
            }
            Self::Postgres(log) => {
                log.append_events(aggregate_id, expected_version, events)
                    .await
            }
        }
    }
}
