//! Application layer for the greeting context.

pub mod command_handlers;
pub mod query_handlers;
