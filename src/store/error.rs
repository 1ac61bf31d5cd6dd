//! Error types for the document store.

use thiserror::Error;

/// Errors that a [`DocumentStore`](super::DocumentStore) operation can fail with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store task is no longer accepting requests.
    #[error("Store closed")]
    Closed,

    /// The store task dropped the response channel.
    #[error("Store dropped response channel")]
    Dropped,

    /// A document with this identifier already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The backing engine reported a failure (connection, timeout, constraint).
    #[error("Backend error: {0}")]
    Backend(String),
}
