//! Ordered record of collaborator calls, shared between recording mocks.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// One call made against a recording store or bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `load_event_source` for an aggregate id.
    Load(Uuid),
    /// `verify_version` with the requested version.
    Verify(Uuid, i64),
    /// `store_event_source` with the number of unsaved events.
    Store(Uuid, usize),
    /// `publish` with the ids of the published events.
    Publish(Vec<Uuid>),
    /// `reply` with the ids of the notifications.
    Reply(Vec<Uuid>),
}

/// Cloneable handle to a shared, ordered list of calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    /// Returns a snapshot of all calls in the order they were made.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Returns the position of the first call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(predicate)
    }
}
