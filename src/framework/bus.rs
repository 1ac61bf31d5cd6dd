//! # Bus
//!
//! This module defines the addressable request/reply bus that connects the
//! HTTP-facing producer to the command dispatcher.
//!
//! ## Key Types
//!
//! - [`EventBus`]: The cloneable handle used to register consumers and send requests.
//! - [`Message`]: A single inbound request, carrying its body and its reply channel.
//! - [`Inbox`]: The receiving end a consumer drains.
//! - [`BusError`]: Transport failures (no consumer, timeout, dropped reply).

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. ERRORS
// =============================================================================

/// Errors that can occur within the bus itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum BusError {
    #[error("No consumer registered for address '{0}'")]
    NoHandlers(String),
    #[error("A consumer is already registered for address '{0}'")]
    AddressInUse(String),
    #[error("Consumer for address '{0}' is closed")]
    Closed(String),
    #[error("Consumer dropped the request without replying")]
    ReplyDropped,
    #[error("No reply received within {0:?}")]
    Timeout(Duration),
}

// =============================================================================
// 2. THE MESSAGE
// =============================================================================

/// Type alias for the one-shot reply channel carried by every message.
pub type ReplySender = oneshot::Sender<Value>;

/// A request delivered to a consumer.
///
/// # Reply Contract
/// The reply channel lives inside the message and [`Message::reply`] consumes
/// the message, so a consumer can answer at most once. Dropping a message
/// without replying surfaces to the requester as [`BusError::ReplyDropped`]
/// instead of leaving it waiting for its timeout.
#[derive(Debug)]
pub struct Message {
    address: String,
    body: Value,
    reply_to: ReplySender,
}

impl Message {
    pub fn new(address: impl Into<String>, body: Value, reply_to: ReplySender) -> Self {
        Self {
            address: address.into(),
            body,
            reply_to,
        }
    }

    /// The request body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Sends the reply back to the requester.
    ///
    /// Returns `false` when the requester is no longer waiting (for example
    /// because its timeout elapsed).
    pub fn reply(self, body: Value) -> bool {
        let delivered = self.reply_to.send(body).is_ok();
        if !delivered {
            warn!(address = %self.address, "Requester gone before reply");
        }
        delivered
    }
}

/// The receiving end of a consumer registration.
pub type Inbox = mpsc::Receiver<Message>;

// =============================================================================
// 3. THE BUS
// =============================================================================

/// An in-process, addressable request/reply bus.
///
/// # Architecture Note
/// Each address maps to exactly one consumer inbox (a bounded `mpsc` channel).
/// A request creates a fresh `oneshot` channel, so replies are correlated to
/// the calling task by construction rather than by matching IDs.
///
/// The registry lock is only held to look up or swap a sender, never across an
/// `.await`.
#[derive(Clone, Default)]
pub struct EventBus {
    consumers: Arc<RwLock<HashMap<String, mpsc::Sender<Message>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the consumer for `address` and returns its inbox.
    ///
    /// # Arguments
    ///
    /// * `address` - The well-known address requests will be sent to.
    /// * `buffer_size` - Capacity of the inbox. When full, requesters wait for space.
    pub fn consumer(&self, address: &str, buffer_size: usize) -> Result<Inbox, BusError> {
        let mut consumers = self
            .consumers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = consumers.get(address) {
            if !existing.is_closed() {
                return Err(BusError::AddressInUse(address.to_string()));
            }
        }
        let (sender, receiver) = mpsc::channel(buffer_size);
        consumers.insert(address.to_string(), sender);
        info!(address, "Consumer registered");
        Ok(receiver)
    }

    /// Removes the consumer for `address`.
    ///
    /// Once every in-flight request has been delivered the consumer's inbox
    /// yields `None`, which is the signal for it to shut down.
    pub fn unregister(&self, address: &str) -> bool {
        let removed = self
            .consumers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(address)
            .is_some();
        if removed {
            info!(address, "Consumer unregistered");
        }
        removed
    }

    /// Sends `body` to the consumer at `address` and waits for its reply.
    ///
    /// The whole exchange (queueing plus handling) is bounded by `timeout`.
    pub async fn request(
        &self,
        address: &str,
        body: Value,
        timeout: Duration,
    ) -> Result<Value, BusError> {
        let sender = self
            .consumers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(address)
            .cloned()
            .ok_or_else(|| BusError::NoHandlers(address.to_string()))?;

        let (reply_to, reply) = oneshot::channel();
        let message = Message::new(address, body, reply_to);

        let exchange = async {
            sender
                .send(message)
                .await
                .map_err(|_| BusError::Closed(address.to_string()))?;
            reply.await.map_err(|_| BusError::ReplyDropped)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => {
                debug!(address, ok = result.is_ok(), "Request completed");
                result
            }
            Err(_) => {
                warn!(address, ?timeout, "Request timed out");
                Err(BusError::Timeout(timeout))
            }
        }
    }
}

// =============================================================================
// 4. TESTS
// =============================================================================
