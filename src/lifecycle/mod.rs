//! Runtime orchestration and lifecycle management.
//!
//! This module contains the infrastructure for running the catalog service:
//!
//! - **Service lifecycle**: Starting the store and dispatcher, then stopping them in order
//! - **Wiring**: Registering the dispatcher at the service address and handing out producers
//! - **Observability setup**: Initializing tracing and logging
//!
//! # Main Components
//!
//! - [`CatalogSystem`] - Owns the bus, the running tasks, and the product client
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use tracing::*;
