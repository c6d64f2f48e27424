//! Message bus contract.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event_log::StoredEvent;
use crate::notification::Notification;

/// Outbound side of message handling.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Broadcasts domain events, in order, to interested subscribers.
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError>;

    /// Sends notifications back toward whoever triggered the unit of work.
    async fn reply(&self, notifications: &[Notification]) -> Result<(), DomainError>;
}
