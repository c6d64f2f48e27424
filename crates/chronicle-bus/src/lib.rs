//! Chronicle bus: in-process `Bus` implementations.
//!
//! [`broadcast::BroadcastBus`] fans published events out to any number of
//! subscribers. [`reply_capture::ReplyCapture`] sits in front of a shared bus
//! for the length of one unit of work and keeps the replies addressed to its
//! caller.

pub mod broadcast;
pub mod reply_capture;
