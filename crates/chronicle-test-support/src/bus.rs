//! Test buses: mock `Bus` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chronicle_core::bus::Bus;
use chronicle_core::error::DomainError;
use chronicle_core::event_log::StoredEvent;
use chronicle_core::notification::Notification;

use crate::call_log::{Call, CallLog};

/// A bus that records every `publish` and `reply` call and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingBus {
    published: Mutex<Vec<Vec<StoredEvent>>>,
    replied: Mutex<Vec<Vec<Notification>>>,
    log: CallLog,
}

impl RecordingBus {
    /// Creates a bus with its own call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus recording into a shared call log, so ordering against
    /// store calls can be asserted.
    #[must_use]
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Returns every batch passed to `publish`, one entry per call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<Vec<StoredEvent>> {
        self.published.lock().unwrap().clone()
    }

    /// Returns every batch passed to `reply`, one entry per call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn replied(&self) -> Vec<Vec<Notification>> {
        self.replied.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bus for RecordingBus {
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError> {
        self.log
            .record(Call::Publish(events.iter().map(|e| e.event_id).collect()));
        self.published.lock().unwrap().push(events.to_vec());
        Ok(())
    }

    async fn reply(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        self.log.record(Call::Reply(
            notifications.iter().map(|n| n.notification_id).collect(),
        ));
        self.replied.lock().unwrap().push(notifications.to_vec());
        Ok(())
    }
}

/// A bus whose every call fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingBus;

#[async_trait]
impl Bus for FailingBus {
    async fn publish(&self, _events: &[StoredEvent]) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("bus unavailable".into()))
    }

    async fn reply(&self, _notifications: &[Notification]) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("bus unavailable".into()))
    }
}
