//! The reply envelope sent from the dispatcher back to the producer.

use crate::model::Product;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Error text for a valid command that matched nothing.
pub const NOT_FOUND: &str = "No items found";

/// Error text for an insert that did not yield a usable identifier.
pub const NOT_ADDED: &str = "Item could not be added";

/// The single reply to a command.
///
/// Success shapes are command specific; failures are always `{"error": ...}`
/// and never carry success fields alongside.
///
/// Variant order matters for decoding: a full product record is tried before
/// the bare `{"id"}` of [`Reply::Added`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Error { error: String },
    Products { products: Vec<Product> },
    Product(Product),
    Added { id: String },
    Updated { updated: bool },
    Deleted { deleted: bool },
}

impl Reply {
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error {
            error: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Reply::error(NOT_FOUND)
    }

    /// Encodes the reply for the bus.
    ///
    /// Encoding cannot fail for these shapes; if it ever did, the failure is
    /// itself turned into an error reply so the requester still gets an answer.
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or_else(|e| json!({ "error": e.to_string() }))
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
