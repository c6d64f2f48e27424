//! Route modules organized by bounded context.

pub mod greeters;
pub mod health;
