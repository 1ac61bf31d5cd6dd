//! # Wire Protocol
//!
//! The envelopes exchanged over the bus: [`Command`] on the way in and
//! [`Reply`] on the way out. Both travel as JSON values.

pub mod command;
pub mod reply;

pub use command::*;
pub use reply::*;
