//! Inbound message abstractions.

use uuid::Uuid;

/// Trait that every message handled as one unit of work implements.
pub trait Message: Send + Sync + std::fmt::Debug {
    /// The type name for this message (for logging/routing).
    fn message_type(&self) -> &'static str;

    /// Correlation ID to trace this message through the system.
    fn correlation_id(&self) -> Uuid;
}
