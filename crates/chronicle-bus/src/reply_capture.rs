//! Per-unit-of-work bus that keeps replies for the caller.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chronicle_core::bus::Bus;
use chronicle_core::error::DomainError;
use chronicle_core::event_log::StoredEvent;
use chronicle_core::notification::Notification;

/// Forwards published events to a shared bus and buffers replies.
///
/// Create one per handled message and read the replies back with
/// [`ReplyCapture::take_replies`] once the unit of work has flushed.
pub struct ReplyCapture {
    inner: Arc<dyn Bus>,
    replies: Mutex<Vec<Notification>>,
}

impl ReplyCapture {
    /// Wraps `inner`, which receives every published event.
    #[must_use]
    pub fn new(inner: Arc<dyn Bus>) -> Self {
        Self {
            inner,
            replies: Mutex::new(Vec::new()),
        }
    }

    /// Drains the buffered replies, in the order they were sent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the buffer lock is poisoned.
    pub fn take_replies(&self) -> Result<Vec<Notification>, DomainError> {
        let mut replies = self.replies.lock().map_err(|_| poisoned())?;
        Ok(std::mem::take(&mut *replies))
    }
}

impl std::fmt::Debug for ReplyCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyCapture")
            .field("replies", &self.replies)
            .finish_non_exhaustive()
    }
}

fn poisoned() -> DomainError {
    DomainError::Infrastructure("reply buffer lock poisoned".into())
}

#[async_trait]
impl Bus for ReplyCapture {
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError> {
        self.inner.publish(events).await
    }

    async fn reply(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        self.replies
            .lock()
            .map_err(|_| poisoned())?
            .extend_from_slice(notifications);
        Ok(())
    }
}
