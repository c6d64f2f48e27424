//! Shared test mocks and utilities for Chronicle.

mod aggregate;
mod bus;
mod call_log;
mod clock;
mod event_log;
mod store;

pub use aggregate::{FakeAggregate, GreetingEvent};
pub use bus::{FailingBus, RecordingBus};
pub use call_log::{Call, CallLog};
pub use clock::FixedClock;
pub use event_log::{EmptyEventLog, FailingEventLog, RecordingEventLog};
pub use store::RecordingEventStore;
