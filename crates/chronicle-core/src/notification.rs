//! Notifications sent back to whoever triggered a unit of work.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message destined for the originating caller rather than for event
/// subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub notification_id: Uuid,
    /// Type name, e.g. `greeting.reply`.
    pub notification_type: String,
    /// The aggregate that produced the notification.
    pub aggregate_id: Uuid,
    /// Correlation ID of the message being handled.
    pub correlation_id: Uuid,
    /// Free-form JSON body.
    pub payload: serde_json::Value,
}

impl Notification {
    /// Creates a notification with a fresh identifier.
    #[must_use]
    pub fn new(
        notification_type: impl Into<String>,
        aggregate_id: Uuid,
        correlation_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            notification_id: Uuid::new_v4(),
            notification_type: notification_type.into(),
            aggregate_id,
            correlation_id,
            payload,
        }
    }
}
