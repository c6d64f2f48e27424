//! Chronicle event store: `EventStore` implementations over event logs.
//!
//! [`log_store::LogEventStore`] rebuilds and persists whole aggregates on
//! top of any [`chronicle_core::event_log::EventLog`]. Two logs ship with the
//! crate: an in-memory one for tests and local runs, and a PostgreSQL one.

pub mod in_memory_event_log;
pub mod log_store;
pub mod pg_event_log;
pub mod schema;
