//! # In-Memory Store
//!
//! An actor-backed [`DocumentStore`]. The [`StoreActor`] owns the collection and
//! processes requests one at a time in its own task; [`MemoryStore`] is the
//! cloneable handle that sends it requests.

use super::{Document, DocumentStore, Filter, FindOptions, StoreError, UpdateOutcome, ID_FIELD};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Message type sent to the [`StoreActor`].
#[derive(Debug)]
pub enum StoreRequest {
    Find {
        filter: Filter,
        options: FindOptions,
        respond_to: Response<Vec<Document>>,
    },
    Insert {
        document: Document,
        respond_to: Response<String>,
    },
    Update {
        filter: Filter,
        set: Document,
        respond_to: Response<UpdateOutcome>,
    },
    Delete {
        filter: Filter,
        respond_to: Response<Option<Document>>,
    },
}

/// The actor that owns a single document collection.
///
/// **Concurrency Model**:
/// Requests are handled sequentially inside one task, so the collection needs
/// no `Mutex`. Documents keep insertion order, which is the natural order a
/// `find` without a sort returns.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    documents: Vec<Document>,
}

impl StoreActor {
    /// Creates a new `StoreActor` and its associated [`MemoryStore`] handle.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the request channel.
    pub fn new(buffer_size: usize) -> (Self, MemoryStore) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            documents: Vec::new(),
        };
        (actor, MemoryStore { sender })
    }

    /// Runs the actor's event loop until every [`MemoryStore`] handle is dropped.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                StoreRequest::Find {
                    filter,
                    options,
                    respond_to,
                } => {
                    let found = self.find(&filter, &options);
                    debug!(?filter, count = found.len(), "Find");
                    let _ = respond_to.send(Ok(found));
                }
                StoreRequest::Insert {
                    document,
                    respond_to,
                } => {
                    let result = self.insert(document);
                    match &result {
                        Ok(id) => info!(%id, size = self.documents.len(), "Inserted"),
                        Err(e) => warn!(error = %e, "Insert failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    filter,
                    set,
                    respond_to,
                } => {
                    let outcome = self.update(&filter, set);
                    debug!(?filter, matched = outcome.matched, modified = outcome.modified, "Update");
                    let _ = respond_to.send(Ok(outcome));
                }
                StoreRequest::Delete { filter, respond_to } => {
                    let removed = self.delete(&filter);
                    debug!(?filter, found = removed.is_some(), size = self.documents.len(), "Delete");
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(size = self.documents.len(), "Store shutdown");
    }

    fn find(&self, filter: &Filter, options: &FindOptions) -> Vec<Document> {
        let mut found: Vec<Document> = self
            .documents
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect();
        if let Some(sort) = &options.sort {
            // Stable sort: ties keep insertion order
            found.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = options.limit {
            found.truncate(limit);
        }
        found
    }

    fn insert(&mut self, mut document: Document) -> Result<String, StoreError> {
        let id = match document.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().simple().to_string(),
        };
        if self.documents.iter().any(|existing| id_of(existing) == Some(id.as_str())) {
            return Err(StoreError::DuplicateKey(id));
        }
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.documents.push(document);
        Ok(id)
    }

    fn update(&mut self, filter: &Filter, set: Document) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        for document in self.documents.iter_mut().filter(|d| filter.matches(d)) {
            outcome.matched += 1;
            let mut changed = false;
            for (field, value) in &set {
                // The identifier is immutable
                if field == ID_FIELD {
                    continue;
                }
                if document.get(field) != Some(value) {
                    document.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                outcome.modified += 1;
            }
        }
        outcome
    }

    fn delete(&mut self, filter: &Filter) -> Option<Document> {
        let position = self.documents.iter().position(|d| filter.matches(d))?;
        Some(self.documents.remove(position))
    }
}

fn id_of(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

/// A cloneable handle to a running [`StoreActor`].
#[derive(Clone)]
pub struct MemoryStore {
    sender: mpsc::Sender<StoreRequest>,
}

impl MemoryStore {
    async fn call<T>(
        &self,
        request: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, filter: Filter, options: FindOptions) -> Result<Vec<Document>, StoreError> {
        self.call(|respond_to| StoreRequest::Find {
            filter,
            options,
            respond_to,
        })
        .await
    }

    async fn insert(&self, document: Document) -> Result<String, StoreError> {
        self.call(|respond_to| StoreRequest::Insert {
            document,
            respond_to,
        })
        .await
    }

    async fn update(&self, filter: Filter, set: Document) -> Result<UpdateOutcome, StoreError> {
        self.call(|respond_to| StoreRequest::Update {
            filter,
            set,
            respond_to,
        })
        .await
    }

    async fn delete(&self, filter: Filter) -> Result<Option<Document>, StoreError> {
        self.call(|respond_to| StoreRequest::Delete { filter, respond_to })
            .await
    }
}
