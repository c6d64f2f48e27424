//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;
use crate::identity::VersionedId;
use crate::notification::Notification;

/// Trait for aggregate roots that reconstitute from event history.
///
/// `version()` counts events that are already durable: replayed from the
/// store or flushed by a previous unit of work. Events produced by command
/// handling stay in `unsaved_events()` until [`AggregateRoot::mark_committed`]
/// is called, and `versioned_id()` reports the version the aggregate will be
/// at once they are stored.
pub trait AggregateRoot: Send + Sync + 'static {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent + Clone + 'static;

    /// Type name used in errors and logs.
    fn aggregate_type() -> &'static str
    where
        Self: Sized;

    /// Creates an empty instance ready to replay history into.
    fn new(id: Uuid) -> Self
    where
        Self: Sized;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the committed version (number of durable events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state (used during reconstitution).
    /// Advances the committed version by one.
    fn apply(&mut self, event: &Self::Event);

    /// Returns unsaved events produced by command handling, in production order.
    fn unsaved_events(&self) -> &[Self::Event];

    /// Returns notifications produced by command handling.
    fn notifications(&self) -> &[Notification];

    /// Clears unsaved events and notifications after a successful flush,
    /// advancing the committed version by the number of cleared events.
    fn mark_committed(&mut self);

    /// Replays `events` in order.
    fn load_from_history<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self: Sized,
    {
        for event in events {
            self.apply(event);
        }
    }

    /// Returns the identity at the version the aggregate reaches after its
    /// unsaved events are stored.
    #[allow(clippy::cast_possible_wrap)]
    fn versioned_id(&self) -> VersionedId {
        VersionedId::new(
            self.aggregate_id(),
            self.version() + self.unsaved_events().len() as i64,
        )
    }

    /// Returns `true` if a flush has anything to store or send.
    fn is_dirty(&self) -> bool {
        !self.unsaved_events().is_empty() || !self.notifications().is_empty()
    }
}
