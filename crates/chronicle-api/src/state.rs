//! Shared application state.

use std::sync::Arc;

use chronicle_bus::broadcast::BroadcastBus;
use chronicle_core::clock::Clock;
use chronicle_event_store::in_memory_event_log::InMemoryEventLog;
use chronicle_event_store::log_store::LogEventStore;

use crate::event_log::AppEventLog;

/// The event store every request shares.
pub type AppEventStore = LogEventStore<AppEventLog>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Aggregate store over the configured event log.
    pub store: Arc<AppEventStore>,
    /// Bus receiving every published event.
    pub bus: Arc<BroadcastBus>,
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(log: AppEventLog, bus: BroadcastBus, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(LogEventStore::new(Arc::new(log))),
            bus: Arc::new(bus),
            clock,
        }
    }

    /// State over a fresh in-memory log.
    #[must_use]
    pub fn in_memory(bus: BroadcastBus, clock: Arc<dyn Clock>) -> Self {
        Self::new(AppEventLog::InMemory(InMemoryEventLog::new()), bus, clock)
    }
}
