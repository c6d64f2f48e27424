//! Unit-of-work repository.
//!
//! A [`Repository`] is created at the start of handling one message and
//! consumed by [`Repository::flush`] at the end. In between it acts as an
//! identity map: every aggregate touched during the unit of work lives in the
//! session exactly once, keyed by its stable identifier, and `get` hands out
//! that same instance on every call.

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::bus::Bus;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::event_log::StoredEvent;
use crate::identity::VersionedId;
use crate::notification::Notification;
use crate::store::EventStore;

/// An aggregate held in the session.
struct Tracked<A> {
    aggregate: A,
}

/// What flushing a single aggregate produced.
struct FlushedAggregate {
    events: Vec<StoredEvent>,
    notifications: Vec<Notification>,
}

/// Type-erased view of a session entry.
#[async_trait]
trait SessionEntry<S: EventStore>: Send + Sync {
    fn aggregate_type(&self) -> &'static str;

    fn is_dirty(&self) -> bool;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Store, then publish, then reply. Only called for dirty entries.
    async fn flush(&mut self, store: &S, bus: &dyn Bus) -> Result<FlushedAggregate, DomainError>;
}

#[async_trait]
impl<S: EventStore, A: AggregateRoot> SessionEntry<S> for Tracked<A> {
    fn aggregate_type(&self) -> &'static str {
        A::aggregate_type()
    }

    fn is_dirty(&self) -> bool {
        self.aggregate.is_dirty()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    async fn flush(&mut self, store: &S, bus: &dyn Bus) -> Result<FlushedAggregate, DomainError> {
        let events: Vec<StoredEvent> = self
            .aggregate
            .unsaved_events()
            .iter()
            .map(DomainEvent::to_stored)
            .collect();
        let notifications = self.aggregate.notifications().to_vec();

        debug!(
            aggregate_type = A::aggregate_type(),
            aggregate_id = %self.aggregate.aggregate_id(),
            events = events.len(),
            notifications = notifications.len(),
            "flushing aggregate"
        );

        if !events.is_empty() {
            store.store_event_source(&self.aggregate).await?;
        }
        self.aggregate.mark_committed();

        if !events.is_empty() {
            bus.publish(&events).await?;
        }
        bus.reply(&notifications).await?;

        Ok(FlushedAggregate {
            events,
            notifications,
        })
    }
}

fn downcast<S: EventStore, A: AggregateRoot>(
    entry: &mut dyn SessionEntry<S>,
) -> Result<&mut A, DomainError> {
    let found = entry.aggregate_type();
    entry
        .as_any_mut()
        .downcast_mut::<Tracked<A>>()
        .map(|tracked| &mut tracked.aggregate)
        .ok_or_else(|| {
            DomainError::IllegalSessionState(format!(
                "session holds a {found} where a {} was requested",
                A::aggregate_type()
            ))
        })
}

/// Summary of a completed flush.
#[derive(Debug, Default, Clone)]
pub struct FlushReport {
    /// Number of aggregates that had something to flush.
    pub aggregates: usize,
    /// Every event stored and published, grouped per aggregate in production
    /// order.
    pub events: Vec<StoredEvent>,
    /// Every notification sent with `reply`.
    pub notifications: Vec<Notification>,
}

/// Session-scoped repository for one unit of work.
///
/// Not meant to be shared between tasks: create one per inbound message.
pub struct Repository<S: EventStore> {
    store: Arc<S>,
    bus: Arc<dyn Bus>,
    session: HashMap<Uuid, Box<dyn SessionEntry<S>>>,
}

impl<S: EventStore> Repository<S> {
    /// Creates an empty session over the shared store and bus.
    #[must_use]
    pub fn new(store: Arc<S>, bus: Arc<dyn Bus>) -> Self {
        Self {
            store,
            bus,
            session: HashMap::new(),
        }
    }

    /// Returns the aggregate for `id`, loading it from the store the first
    /// time it is requested in this unit of work.
    ///
    /// The requested version is checked against the aggregate on every call,
    /// including calls served from the session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateRootNotFound` if the store has no
    /// history for `id`, `DomainError::OptimisticLockingFailure` if
    /// `id.version` is stale, and `DomainError::IllegalSessionState` if the
    /// session holds a different aggregate type under the same id.
    #[instrument(skip_all, fields(aggregate_type = A::aggregate_type(), id = %id))]
    pub async fn get<A: AggregateRoot>(&mut self, id: VersionedId) -> Result<&mut A, DomainError> {
        let slot = match self.session.entry(id.id) {
            Entry::Occupied(occupied) => {
                let aggregate = downcast::<S, A>(occupied.into_mut().as_mut())?;
                if let Err(err) = self.store.verify_version(&*aggregate, id).await {
                    warn!(error = %err, "version check failed for session aggregate");
                    return Err(err);
                }
                debug!("served aggregate from session");
                return Ok(aggregate);
            }
            Entry::Vacant(vacant) => vacant,
        };

        let loaded: Option<A> = self.store.load_event_source(id).await?;
        let Some(aggregate) = loaded else {
            return Err(DomainError::AggregateRootNotFound {
                aggregate_type: A::aggregate_type(),
                aggregate_id: id.id,
            });
        };
        if let Err(err) = self.store.verify_version(&aggregate, id).await {
            warn!(error = %err, "version check failed for loaded aggregate");
            return Err(err);
        }
        debug!(version = aggregate.version(), "loaded aggregate into session");

        let entry = slot.insert(Box::new(Tracked { aggregate }));
        downcast::<S, A>(entry.as_mut())
    }

    /// Registers a newly created aggregate with the session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalSessionState` if the session already
    /// holds an aggregate with the same identifier.
    pub fn add<A: AggregateRoot>(&mut self, aggregate: A) -> Result<&mut A, DomainError> {
        let aggregate_id = aggregate.aggregate_id();
        match self.session.entry(aggregate_id) {
            Entry::Occupied(existing) => Err(DomainError::IllegalSessionState(format!(
                "{} {aggregate_id} is already part of this unit of work as a {}",
                A::aggregate_type(),
                existing.get().aggregate_type()
            ))),
            Entry::Vacant(slot) => {
                debug!(
                    aggregate_type = A::aggregate_type(),
                    %aggregate_id,
                    "added aggregate to session"
                );
                let entry = slot.insert(Box::new(Tracked { aggregate }));
                downcast::<S, A>(entry.as_mut())
            }
        }
    }

    /// Returns `true` if an aggregate with this identifier is in the session.
    #[must_use]
    pub fn contains(&self, aggregate_id: Uuid) -> bool {
        self.session.contains_key(&aggregate_id)
    }

    /// Number of aggregates in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.session.len()
    }

    /// Returns `true` if nothing has been added or loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    /// Commits the unit of work: for every aggregate with unsaved events or
    /// notifications, stores the events, publishes them, and replies with
    /// the notifications. The session is consumed either way.
    ///
    /// # Errors
    ///
    /// Propagates the first store or bus error. Aggregates flushed before the
    /// failure stay stored and published.
    #[instrument(skip(self), fields(session_size = self.session.len()))]
    pub async fn flush(self) -> Result<FlushReport, DomainError> {
        let Self {
            store,
            bus,
            session,
        } = self;

        let mut report = FlushReport::default();
        for (_, mut entry) in session {
            if !entry.is_dirty() {
                continue;
            }
            let flushed = entry.flush(store.as_ref(), bus.as_ref()).await?;
            report.aggregates += 1;
            report.events.extend(flushed.events);
            report.notifications.extend(flushed.notifications);
        }

        info!(
            aggregates = report.aggregates,
            events = report.events.len(),
            notifications = report.notifications.len(),
            "unit of work flushed"
        );
        Ok(report)
    }

    /// Drops the session without storing or publishing anything.
    pub fn discard(self) {
        debug!(session_size = self.session.len(), "unit of work discarded");
    }
}
