//! In-process request/reply bus.
//!
//! This module provides the transport the producer and the dispatcher share.
//! They never call each other directly; they only know the service address.
//!
//! # Main Components
//!
//! - [`EventBus`] - Registers consumers and sends requests
//! - [`Message`] - One request plus its single-use reply channel
//! - [`BusError`] - Transport failures
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test producers without a dispatcher.

pub mod bus;
pub mod mock;

// Re-export core types for convenience
pub use bus::*;
