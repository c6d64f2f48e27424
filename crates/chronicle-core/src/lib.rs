//! Chronicle Core: event-sourcing abstractions and the unit-of-work repository.
//!
//! This crate defines the aggregate, event, store and bus contracts, and the
//! session-scoped [`repository::Repository`] that ties them together for one
//! unit of work. It contains no infrastructure code.

pub mod aggregate;
pub mod bus;
pub mod clock;
pub mod error;
pub mod event;
pub mod event_log;
pub mod identity;
pub mod message;
pub mod notification;
pub mod repository;
pub mod store;
pub mod unit_of_work;
