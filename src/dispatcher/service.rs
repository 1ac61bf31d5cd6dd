//! # Command Dispatcher
//!
//! Drains the service inbox, decodes each envelope into a [`Command`], runs the
//! matching store operation and answers with exactly one [`Reply`].

use super::DispatchError;
use crate::framework::{Inbox, Message};
use crate::model::{Product, ProductPayload};
use crate::protocol::{Command, Reply};
use crate::store::{DocumentStore, Filter, FindOptions, Sort};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Field the product listing is ordered by (descending).
pub const LIST_SORT_FIELD: &str = "number";

/// The service side of the catalog protocol.
///
/// # Architecture Note
/// The dispatcher owns a shared handle to the store, injected at construction.
/// Each inbound message is handled in its own task, so a slow store call for
/// one request never holds up another.
///
/// Every handler goes through [`CommandDispatcher::handle`], which computes a
/// [`Reply`] on every path (decode failures and store failures included) and
/// then sends it once. There is no branch that returns without replying.
pub struct CommandDispatcher<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> Clone for CommandDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> CommandDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Runs the dispatcher until its inbox closes.
    ///
    /// Requests still in flight when the inbox closes are allowed to finish
    /// (and reply) before this returns.
    pub async fn run(self, mut inbox: Inbox) {
        info!("Dispatcher started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                message = inbox.recv() => match message {
                    Some(message) => {
                        let dispatcher = self.clone();
                        in_flight.spawn(async move { dispatcher.handle(message).await });
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Handler task failed");
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Handler task failed");
            }
        }
        info!("Dispatcher shutdown");
    }

    /// Handles one message: dispatch, then reply.
    pub async fn handle(&self, message: Message) {
        let reply = self.dispatch(message.body()).await;
        message.reply(reply.into_value());
    }

    /// Turns an envelope into its reply.
    pub async fn dispatch(&self, envelope: &Value) -> Reply {
        let result = match Command::decode(envelope) {
            Ok(command) => {
                debug!(command = command.tag(), "Dispatching");
                self.execute(command).await
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                match &e {
                    DispatchError::Store(cause) => error!(error = %cause, "Store operation failed"),
                    DispatchError::Protocol(cause) => warn!(error = %cause, %envelope, "Rejected envelope"),
                    DispatchError::NotFound | DispatchError::NotAdded => debug!(error = %e, "Command failed"),
                }
                Reply::error(e.to_string())
            }
        }
    }

    async fn execute(&self, command: Command) -> Result<Reply, DispatchError> {
        match command {
            Command::FindAll => self.find_all().await,
            Command::FindById { id } => self.find_by_id(id).await,
            Command::Add { payload } => self.add(payload).await,
            Command::Update { id, payload } => self.update(id, payload).await,
            Command::Delete { id } => self.delete(id).await,
        }
    }

    async fn find_all(&self) -> Result<Reply, DispatchError> {
        let options = FindOptions::sorted(Sort::descending(LIST_SORT_FIELD));
        let documents = self.store.find(Filter::All, options).await?;
        if documents.is_empty() {
            return Err(DispatchError::NotFound);
        }
        info!(count = documents.len(), "Listed products");
        Ok(Reply::Products {
            products: documents.iter().map(Product::from_document).collect(),
        })
    }

    async fn find_by_id(&self, id: String) -> Result<Reply, DispatchError> {
        let options = FindOptions {
            sort: None,
            limit: Some(1),
        };
        let documents = self.store.find(Filter::by_id(id), options).await?;
        let document = documents.first().ok_or(DispatchError::NotFound)?;
        Ok(Reply::Product(Product::from_document(document)))
    }

    async fn add(&self, payload: ProductPayload) -> Result<Reply, DispatchError> {
        let id = self.store.insert(payload.into_document()).await?;
        if id.trim().is_empty() {
            return Err(DispatchError::NotAdded);
        }
        info!(%id, "Product added");
        Ok(Reply::Added { id })
    }

    async fn update(&self, id: String, payload: ProductPayload) -> Result<Reply, DispatchError> {
        let outcome = self
            .store
            .update(Filter::by_id(id.clone()), payload.into_document())
            .await?;
        if outcome.matched == 0 {
            return Err(DispatchError::NotFound);
        }
        info!(%id, modified = outcome.modified, "Product updated");
        Ok(Reply::Updated { updated: true })
    }

    async fn delete(&self, id: String) -> Result<Reply, DispatchError> {
        match self.store.delete(Filter::by_id(id.clone())).await? {
            Some(_) => {
                info!(%id, "Product deleted");
                Ok(Reply::Deleted { deleted: true })
            }
            None => Err(DispatchError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{NOT_ADDED, NOT_FOUND};
    use crate::store::mock::{MockStore, RecordedCall};
    use crate::store::{Document, StoreError, UpdateOutcome};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn add_envelope() -> Value {
        json!({ "command": "ADD", "payload": { "number": "432", "description": "Item 2" } })
    }

    #[tokio::test]
    async fn test_find_all_sorts_by_number_descending() {
        let store = MockStore::new();
        store.expect_find().return_ok(vec![
            doc(json!({ "_id": "b", "number": "9", "description": "Nine" })),
            doc(json!({ "_id": "a", "number": "1", "description": "One" })),
        ]);
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&json!({ "command": "FIND_ALL" })).await;

        assert_eq!(
            reply,
            Reply::Products {
                products: vec![Product::new("b", "9", "Nine"), Product::new("a", "1", "One")]
            }
        );
        assert_eq!(
            store.calls(),
            vec![RecordedCall::Find {
                filter: Filter::All,
                options: FindOptions::sorted(Sort::descending("number")),
            }]
        );
        store.verify();
    }

    #[tokio::test]
    async fn test_find_all_on_empty_store_is_not_found() {
        let store = MockStore::new();
        store.expect_find().return_ok(vec![]);
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&json!({ "command": "FIND_ALL" })).await;
        assert_eq!(reply, Reply::error(NOT_FOUND));
        store.verify();
    }

    #[tokio::test]
    async fn test_find_by_id_returns_bare_record() {
        let store = MockStore::new();
        store
            .expect_find()
            .return_ok(vec![doc(json!({ "_id": "XYZ", "number": "5", "description": "Five" }))]);
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher
            .dispatch(&json!({ "command": "FIND_BY_ID", "id": "XYZ" }))
            .await;
        assert_eq!(
            reply.into_value(),
            json!({ "id": "XYZ", "number": "5", "description": "Five" })
        );
        store.verify();
    }

    #[tokio::test]
    async fn test_add_with_blank_id_is_not_added() {
        let store = MockStore::new();
        store.expect_insert().return_ok("   ".to_string());
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&add_envelope()).await;
        assert_eq!(reply, Reply::error(NOT_ADDED));
        store.verify();
    }

    #[tokio::test]
    async fn test_add_inserts_payload_fields() {
        let store = MockStore::new();
        store.expect_insert().return_ok("34241123".to_string());
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&add_envelope()).await;
        assert_eq!(reply, Reply::Added { id: "34241123".into() });
        assert_eq!(
            store.calls(),
            vec![RecordedCall::Insert {
                document: doc(json!({ "number": "432", "description": "Item 2" })),
            }]
        );
    }

    #[tokio::test]
    async fn test_update_store_failure_still_replies() {
        let store = MockStore::new();
        store
            .expect_update()
            .return_err(StoreError::Backend("connection reset".into()));
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher
            .dispatch(&json!({
                "command": "UPDATE",
                "id": "1",
                "payload": { "number": "1", "description": "d" }
            }))
            .await;
        assert_eq!(
            reply,
            Reply::error("store failure: Backend error: connection reset")
        );
        store.verify();
    }

    #[tokio::test]
    async fn test_delete_store_failure_still_replies() {
        let store = MockStore::new();
        store
            .expect_delete()
            .return_err(StoreError::Backend("socket closed".into()));
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher
            .dispatch(&json!({ "command": "DELETE", "id": "1" }))
            .await;
        assert_eq!(
            reply,
            Reply::error("store failure: Backend error: socket closed")
        );
        store.verify();
    }

    #[tokio::test]
    async fn test_add_duplicate_key_still_replies() {
        let store = MockStore::new();
        store
            .expect_insert()
            .return_err(StoreError::DuplicateKey("34241123".into()));
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&add_envelope()).await;
        assert_eq!(reply, Reply::error("store failure: Duplicate key: 34241123"));
        store.verify();
    }

    #[tokio::test]
    async fn test_update_without_match_is_not_found() {
        let store = MockStore::new();
        store.expect_update().return_ok(UpdateOutcome::default());
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher
            .dispatch(&json!({
                "command": "UPDATE",
                "id": "gone",
                "payload": { "number": "1", "description": "d" }
            }))
            .await;
        assert_eq!(reply, Reply::not_found());
    }

    #[tokio::test]
    async fn test_delete_twice_replies_both_times() {
        let store = MockStore::new();
        store
            .expect_delete()
            .return_ok(Some(doc(json!({ "_id": "1" }))));
        store.expect_delete().return_ok(None);
        let dispatcher = CommandDispatcher::new(store.clone());
        let envelope = json!({ "command": "DELETE", "id": "1" });

        assert_eq!(dispatcher.dispatch(&envelope).await, Reply::Deleted { deleted: true });
        assert_eq!(dispatcher.dispatch(&envelope).await, Reply::not_found());
        store.verify();
    }

    #[tokio::test]
    async fn test_unknown_command_never_touches_store() {
        let store = MockStore::new();
        let dispatcher = CommandDispatcher::new(store.clone());

        let reply = dispatcher.dispatch(&json!({ "command": "PURGE" })).await;
        assert_eq!(reply, Reply::error("unknown command"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_error_messages_match_wire_constants() {
        assert_eq!(DispatchError::NotFound.to_string(), NOT_FOUND);
        assert_eq!(DispatchError::NotAdded.to_string(), NOT_ADDED);
    }
}
