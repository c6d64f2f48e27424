//! Chronicle greeting bounded context.
//!
//! Greeters are created with a name and greet people on request. Every
//! greeting is recorded as an event and answered with a reply notification,
//! which makes this context a compact end-to-end exercise of the unit-of-work
//! repository.

pub mod application;
pub mod domain;
