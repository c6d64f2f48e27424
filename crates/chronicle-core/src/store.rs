//! Aggregate-level event store contract and the shared version check.

use async_trait::async_trait;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::identity::VersionedId;

/// Durable load/store of whole aggregates.
///
/// Operations are generic over the aggregate type so one store serves every
/// aggregate in a unit of work.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Rebuilds an aggregate by replaying its persisted history.
    ///
    /// Returns `Ok(None)` when no history exists for `id.id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the history cannot be read or
    /// decoded.
    async fn load_event_source<A: AggregateRoot>(
        &self,
        id: VersionedId,
    ) -> Result<Option<A>, DomainError>;

    /// Persists the aggregate's unsaved events on top of its committed
    /// version. For an aggregate created in this unit of work that is its
    /// entire history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OptimisticLockingFailure` if the stream was
    /// written concurrently, or `DomainError::Infrastructure` on I/O failure.
    async fn store_event_source<A: AggregateRoot>(&self, aggregate: &A)
    -> Result<(), DomainError>;

    /// Fails if `requested` is not a version the caller may act on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OptimisticLockingFailure` on a version conflict.
    async fn verify_version<A: AggregateRoot>(
        &self,
        aggregate: &A,
        requested: VersionedId,
    ) -> Result<(), DomainError> {
        check_version(aggregate, requested)
    }
}

/// Optimistic concurrency policy shared by store implementations.
///
/// `requested.version` passes when it lies between the aggregate's committed
/// version and the version immediately following its unsaved events. Anything
/// older is stale; anything newer was never produced.
///
/// # Errors
///
/// Returns `DomainError::OptimisticLockingFailure` when the version is out of
/// range, or `DomainError::IllegalSessionState` when `requested` names a
/// different aggregate.
pub fn check_version<A: AggregateRoot + ?Sized>(
    aggregate: &A,
    requested: VersionedId,
) -> Result<(), DomainError> {
    let current = aggregate.versioned_id();
    if !current.is_for_same_aggregate(&requested) {
        return Err(DomainError::IllegalSessionState(format!(
            "requested identity {requested} does not belong to aggregate {}",
            current.id
        )));
    }

    let committed = aggregate.version();
    if requested.version < committed || requested.version > current.version + 1 {
        return Err(DomainError::OptimisticLockingFailure {
            aggregate_id: current.id,
            requested: requested.version,
            actual: current.version,
        });
    }

    Ok(())
}
