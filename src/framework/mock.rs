//! # Mock Consumer
//!
//! Utilities for testing producers in isolation.
//!
//! Use [`create_mock_consumer`] to register an inbox on a bus without a real
//! dispatcher behind it, then [`expect_command`] to assert on the next envelope
//! and answer it by hand:
//!
//! ```ignore
//! let (bus, mut inbox) = create_mock_consumer("catalog.products");
//! let client = ProductClient::new(bus, "catalog.products", Duration::from_secs(1));
//!
//! let call = tokio::spawn(async move { client.list().await });
//! let (command, message) = expect_command(&mut inbox).await.expect("Expected a command");
//! assert_eq!(command, Command::FindAll);
//! message.reply(json!({ "products": [] }));
//! ```

use super::{EventBus, Inbox, Message};
use crate::protocol::Command;

/// Creates a bus with a bare inbox registered at `address`.
pub fn create_mock_consumer(address: &str) -> (EventBus, Inbox) {
    let bus = EventBus::new();
    let inbox = bus
        .consumer(address, 16)
        .expect("fresh bus has no consumers");
    (bus, inbox)
}

/// Waits for the next message and decodes its command.
///
/// Returns `None` if the inbox closed or the envelope is not a valid command.
pub async fn expect_command(inbox: &mut Inbox) -> Option<(Command, Message)> {
    let message = inbox.recv().await?;
    let command = Command::decode(message.body()).ok()?;
    Some((command, message))
}
