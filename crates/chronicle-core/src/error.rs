//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No event history exists for the requested aggregate.
    #[error("aggregate root not found: {aggregate_type} {aggregate_id}")]
    AggregateRootNotFound {
        /// Type name of the requested aggregate.
        aggregate_type: &'static str,
        /// Stable identifier of the requested aggregate.
        aggregate_id: Uuid,
    },

    /// Optimistic concurrency conflict.
    #[error(
        "optimistic locking failure on aggregate {aggregate_id}: requested version {requested}, actual version {actual}"
    )]
    OptimisticLockingFailure {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the caller asked for.
        requested: i64,
        /// The version the aggregate or stream is actually at.
        actual: i64,
    },

    /// The unit-of-work session was used in a way that breaks its identity map.
    #[error("illegal session state: {0}")]
    IllegalSessionState(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
