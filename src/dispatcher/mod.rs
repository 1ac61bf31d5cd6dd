//! # Dispatcher
//!
//! The service layer of the catalog. It subscribes to the well-known service
//! address and answers every command envelope sent there.
//!
//! ## Structure
//!
//! - [`service`] - [`CommandDispatcher`], the demultiplexing handler
//! - [`error`] - [`DispatchError`], the taxonomy behind every error reply
//! - [`spawn()`] - Registers the consumer and starts the dispatcher task
//!
//! ## Usage
//!
//! ```rust
//! use catalog_bus::dispatcher;
//! use catalog_bus::framework::EventBus;
//! use catalog_bus::store::StoreActor;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = EventBus::new();
//!     let (store_actor, store) = StoreActor::new(16);
//!     tokio::spawn(store_actor.run());
//!
//!     dispatcher::spawn(&bus, "catalog.products", 16, store).unwrap();
//!
//!     let reply = bus
//!         .request("catalog.products", json!({ "command": "FIND_ALL" }), Duration::from_secs(1))
//!         .await
//!         .unwrap();
//!     assert_eq!(reply, json!({ "error": "No items found" }));
//! }
//! ```

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;

use crate::framework::{BusError, EventBus};
use crate::store::DocumentStore;
use tokio::task::JoinHandle;

/// Registers a dispatcher as the consumer of `address` and spawns it.
///
/// The returned task finishes once the address is unregistered and every
/// in-flight request has been answered.
pub fn spawn<S: DocumentStore>(
    bus: &EventBus,
    address: &str,
    buffer_size: usize,
    store: S,
) -> Result<JoinHandle<()>, BusError> {
    let inbox = bus.consumer(address, buffer_size)?;
    let dispatcher = CommandDispatcher::new(store);
    Ok(tokio::spawn(dispatcher.run(inbox)))
}
