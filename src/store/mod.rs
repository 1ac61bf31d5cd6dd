//! # Document Store
//!
//! The persistence collaborator the dispatcher talks to. The store is reached
//! only through the [`DocumentStore`] trait, a generic find/insert/update/delete
//! capability over a single collection of JSON documents.
//!
//! ## Structure
//!
//! - [`memory`] - [`MemoryStore`], an actor-backed in-process collection
//! - [`mock`] - [`MockStore`](mock::MockStore), scripted outcomes for tests
//! - [`error`] - [`StoreError`]

pub mod error;
pub mod memory;
pub mod mock;

pub use error::*;
pub use memory::{MemoryStore, StoreActor};

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// The key under which a document's identifier is stored.
pub const ID_FIELD: &str = "_id";

/// Selects the documents an operation applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose `field` equals `value`.
    Eq { field: String, value: Value },
}

impl Filter {
    /// Matches the single document with the given identifier.
    pub fn by_id(id: impl Into<String>) -> Self {
        Filter::Eq {
            field: ID_FIELD.to_string(),
            value: Value::String(id.into()),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => document.get(field) == Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key for a `find`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// Orders two documents by this key. Missing fields sort first.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        // Mixed types: fall back to their JSON text so the order is at least total
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

/// Options for [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            limit: None,
        }
    }
}

/// Counts reported by [`DocumentStore::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// The store capability consumed by the dispatcher.
///
/// Implementations are shared handles: cheap to use from many concurrent
/// tasks, owning any pooling or serialization internally.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Returns the documents matching `filter`, ordered and limited by `options`.
    async fn find(&self, filter: Filter, options: FindOptions) -> Result<Vec<Document>, StoreError>;

    /// Inserts a document and returns its identifier.
    ///
    /// An identifier is generated unless the document already carries one
    /// under [`ID_FIELD`].
    async fn insert(&self, document: Document) -> Result<String, StoreError>;

    /// Sets the fields of `set` on every document matching `filter`.
    ///
    /// Fields not named in `set` are left untouched.
    async fn update(&self, filter: Filter, set: Document) -> Result<UpdateOutcome, StoreError>;

    /// Removes the first document matching `filter` and returns it.
    async fn delete(&self, filter: Filter) -> Result<Option<Document>, StoreError>;
}
