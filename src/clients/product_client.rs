//! # Product Client
//!
//! The producer side of the catalog protocol. Each catalog operation becomes
//! one [`Command`] sent to the service address; the single [`Reply`] is then
//! translated into an outward [`ApiResponse`].

use super::ClientError;
use crate::framework::EventBus;
use crate::model::{Product, ProductInput};
use crate::protocol::{Command, Reply, NOT_ADDED};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// An outward status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn from_error(error: &ClientError) -> Self {
        Self::new(error.status(), json!({ "error": error.to_string() }))
    }
}

/// Client for sending catalog commands over the bus.
#[derive(Clone)]
pub struct ProductClient {
    bus: EventBus,
    address: Arc<str>,
    timeout: Duration,
}

impl ProductClient {
    /// # Arguments
    /// * `bus` - The shared bus
    /// * `address` - The dispatcher's service address
    /// * `timeout` - Upper bound on each request/reply exchange
    pub fn new(bus: EventBus, address: impl Into<Arc<str>>, timeout: Duration) -> Self {
        Self {
            bus,
            address: address.into(),
            timeout,
        }
    }

    /// Sends one command and decodes its reply.
    #[instrument(skip(self, command), fields(command = command.tag()))]
    pub async fn send(&self, command: Command) -> Result<Reply, ClientError> {
        debug!("Sending request");
        let envelope = command
            .encode()
            .map_err(|e| ClientError::Encode(e.to_string()))?;
        let raw = self.bus.request(&self.address, envelope, self.timeout).await?;
        Reply::from_value(raw.clone()).map_err(|_| ClientError::UnexpectedReply(raw.to_string()))
    }

    /// `FIND_ALL`: 200 with `{products}`, 400 with the error reply.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ApiResponse {
        match self.send(Command::FindAll).await {
            Ok(reply @ Reply::Products { .. }) => ApiResponse::new(StatusCode::OK, reply.into_value()),
            Ok(reply @ Reply::Error { .. }) => {
                ApiResponse::new(StatusCode::BAD_REQUEST, reply.into_value())
            }
            Ok(other) => unexpected(other),
            Err(e) => failed(e),
        }
    }

    /// `FIND_BY_ID`: 200 with the record, 400 with the error reply.
    #[instrument(skip(self))]
    pub async fn get(&self, id: String) -> ApiResponse {
        match self.send(Command::FindById { id }).await {
            Ok(reply @ Reply::Product(_)) => ApiResponse::new(StatusCode::OK, reply.into_value()),
            Ok(reply @ Reply::Error { .. }) => {
                ApiResponse::new(StatusCode::BAD_REQUEST, reply.into_value())
            }
            Ok(other) => unexpected(other),
            Err(e) => failed(e),
        }
    }

    /// `ADD`: 201 with the new product when the reply carries a non-blank id,
    /// 400 in every other case.
    #[instrument(skip(self))]
    pub async fn create(&self, input: ProductInput) -> ApiResponse {
        let payload = match input.validate() {
            Ok(payload) => payload,
            Err(e) => return failed(e.into()),
        };
        let mut product = Product::from_payload(&payload);

        match self.send(Command::Add { payload }).await {
            Ok(Reply::Added { id }) if !id.trim().is_empty() => {
                product.id = id;
                ApiResponse::new(StatusCode::CREATED, json!(product))
            }
            Ok(reply @ Reply::Error { .. }) => {
                ApiResponse::new(StatusCode::BAD_REQUEST, reply.into_value())
            }
            Ok(_) => ApiResponse::new(StatusCode::BAD_REQUEST, Reply::error(NOT_ADDED).into_value()),
            Err(e) => failed(e),
        }
    }

    /// `UPDATE`: 200 with `{updated: true}` exactly when the reply says so,
    /// otherwise 400 with `{updated: false}`.
    #[instrument(skip(self))]
    pub async fn update(&self, id: String, input: ProductInput) -> ApiResponse {
        let payload = match input.validate() {
            Ok(payload) => payload,
            Err(e) => return failed(e.into()),
        };

        match self.send(Command::Update { id, payload }).await {
            Ok(Reply::Updated { updated: true }) => {
                ApiResponse::new(StatusCode::OK, json!({ "updated": true }))
            }
            Ok(_) => ApiResponse::new(StatusCode::BAD_REQUEST, json!({ "updated": false })),
            Err(e) => failed(e),
        }
    }

    /// `DELETE`: 200 with `{deleted: true}` when the reply confirms it,
    /// 400 with the error reply otherwise.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: String) -> ApiResponse {
        match self.send(Command::Delete { id }).await {
            Ok(Reply::Deleted { deleted: true }) => {
                ApiResponse::new(StatusCode::OK, json!({ "deleted": true }))
            }
            Ok(reply @ Reply::Error { .. }) => {
                ApiResponse::new(StatusCode::BAD_REQUEST, reply.into_value())
            }
            Ok(_) => ApiResponse::new(StatusCode::BAD_REQUEST, json!({ "deleted": false })),
            Err(e) => failed(e),
        }
    }
}

fn failed(error: ClientError) -> ApiResponse {
    match &error {
        ClientError::Validation(_) => debug!(error = %error, "Rejected input"),
        _ => warn!(error = %error, "Request failed"),
    }
    ApiResponse::from_error(&error)
}

fn unexpected(reply: Reply) -> ApiResponse {
    failed(ClientError::UnexpectedReply(reply.into_value().to_string()))
}
