//! Fan-out bus over a `tokio::sync::broadcast` channel.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use chronicle_core::bus::Bus;
use chronicle_core::error::DomainError;
use chronicle_core::event_log::StoredEvent;
use chronicle_core::notification::Notification;

/// Default channel capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Shared bus broadcasting every published event to all live subscribers.
///
/// Subscribers that fall more than `capacity` events behind observe a lag
/// error on their receiver; the publisher is never blocked.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    tx: broadcast::Sender<StoredEvent>,
}

impl BroadcastBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoredEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl Bus for BroadcastBus {
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError> {
        for event in events {
            // No subscribers is not a failure.
            if self.tx.send(event.clone()).is_err() {
                debug!(event_id = %event.event_id, "published event had no subscribers");
            }
        }
        Ok(())
    }

    async fn reply(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        debug!(
            count = notifications.len(),
            "dropping replies sent to shared bus"
        );
        Ok(())
    }
}
