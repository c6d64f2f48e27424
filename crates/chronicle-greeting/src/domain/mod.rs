//! Domain layer for the greeting context.

pub mod aggregates;
pub mod commands;
pub mod events;
