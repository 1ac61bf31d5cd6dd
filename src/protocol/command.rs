//! The command envelope sent from the producer to the dispatcher.

use crate::model::ProductPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the envelope field carrying the command tag.
pub const COMMAND_FIELD: &str = "command";

/// Errors raised while decoding an inbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The `command` field is missing, not a string, or not a known tag.
    #[error("unknown command")]
    UnknownCommand,

    /// The tag is known but the fields it requires are missing or mistyped.
    #[error("malformed command: {0}")]
    Malformed(String),
}

/// The closed set of catalog commands.
///
/// On the wire the variant is carried in the `command` field
/// (`FIND_ALL`, `FIND_BY_ID`, `ADD`, `UPDATE`, `DELETE`), next to the
/// variant's own fields:
///
/// ```text
/// {"command":"FIND_BY_ID","id":"abc"}
/// {"command":"ADD","payload":{"number":"432","description":"Item 2"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    FindAll,
    FindById { id: String },
    Add { payload: ProductPayload },
    Update { id: String, payload: ProductPayload },
    Delete { id: String },
}

impl Command {
    /// Every tag a [`Command`] can carry.
    pub const TAGS: [&'static str; 5] = ["FIND_ALL", "FIND_BY_ID", "ADD", "UPDATE", "DELETE"];

    /// The wire tag for this command.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::FindAll => "FIND_ALL",
            Command::FindById { .. } => "FIND_BY_ID",
            Command::Add { .. } => "ADD",
            Command::Update { .. } => "UPDATE",
            Command::Delete { .. } => "DELETE",
        }
    }

    /// Decodes an envelope.
    ///
    /// An absent or unrecognized tag is reported as
    /// [`ProtocolError::UnknownCommand`] before any field is looked at.
    pub fn decode(envelope: &Value) -> Result<Self, ProtocolError> {
        let tag = envelope
            .get(COMMAND_FIELD)
            .and_then(Value::as_str)
            .ok_or(ProtocolError::UnknownCommand)?;
        if !Self::TAGS.contains(&tag) {
            return Err(ProtocolError::UnknownCommand);
        }
        Command::deserialize(envelope).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Encodes this command as an envelope.
    pub fn encode(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_uses_screaming_tags() {
        let command = Command::Add {
            payload: ProductPayload {
                number: "432".into(),
                description: "Item 2".into(),
            },
        };
        assert_eq!(
            command.encode().unwrap(),
            json!({
                "command": "ADD",
                "payload": { "number": "432", "description": "Item 2" }
            })
        );
        assert_eq!(
            Command::FindAll.encode().unwrap(),
            json!({ "command": "FIND_ALL" })
        );
    }

    #[test]
    fn test_decode_known_commands() {
        let decoded = Command::decode(&json!({ "command": "FIND_BY_ID", "id": "XYZ" })).unwrap();
        assert_eq!(decoded, Command::FindById { id: "XYZ".into() });

        // Extra fields are ignored
        let decoded = Command::decode(&json!({ "command": "FIND_ALL", "payload": {} })).unwrap();
        assert_eq!(decoded, Command::FindAll);
    }

    #[test]
    fn test_decode_missing_or_unknown_tag() {
        assert_eq!(
            Command::decode(&json!({ "id": "1" })),
            Err(ProtocolError::UnknownCommand)
        );
        assert_eq!(
            Command::decode(&json!({ "command": "PURGE" })),
            Err(ProtocolError::UnknownCommand)
        );
        assert_eq!(
            Command::decode(&json!({ "command": 7 })),
            Err(ProtocolError::UnknownCommand)
        );
        assert_eq!(Command::decode(&json!("FIND_ALL")), Err(ProtocolError::UnknownCommand));
    }

    #[test]
    fn test_decode_known_tag_with_missing_fields_is_malformed() {
        let result = Command::decode(&json!({ "command": "UPDATE", "id": "1" }));
        match result {
            Err(ProtocolError::Malformed(detail)) => assert!(detail.contains("payload")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_every_tag_round_trips_through_decode() {
        for tag in Command::TAGS {
            let envelope = json!({
                "command": tag,
                "id": "1",
                "payload": { "number": "1", "description": "d" }
            });
            assert_eq!(Command::decode(&envelope).unwrap().tag(), tag);
        }
    }
}
