//! Producer-side clients that hide the bus behind catalog operations.

pub mod error;
pub mod product_client;

pub use error::*;
pub use product_client::*;
