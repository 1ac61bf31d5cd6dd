//! Error types for the command dispatcher.

use crate::protocol::ProtocolError;
use crate::store::StoreError;
use thiserror::Error;

/// Everything that turns a command into an error reply.
///
/// The `Display` text of each variant is exactly the `error` string the
/// requester receives.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The envelope could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The command was valid but no document matched.
    #[error("No items found")]
    NotFound,

    /// The store accepted the insert but returned no usable identifier.
    #[error("Item could not be added")]
    NotAdded,

    /// The store operation itself failed.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}
