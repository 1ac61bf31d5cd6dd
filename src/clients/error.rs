//! Error types for the product client.

use crate::framework::BusError;
use crate::model::ValidationError;
use axum::http::StatusCode;
use thiserror::Error;

/// Errors that keep the producer from getting a usable reply.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// The request body failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The bus could not deliver the command or return its reply.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The command could not be encoded as an envelope.
    #[error("Could not encode command: {0}")]
    Encode(String),

    /// The reply did not have any recognized shape.
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
}

impl ClientError {
    /// The outward HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ClientError::Validation(_) => StatusCode::BAD_REQUEST,
            ClientError::Bus(BusError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ClientError::Bus(BusError::NoHandlers(_) | BusError::Closed(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ClientError::Bus(BusError::ReplyDropped) | ClientError::UnexpectedReply(_) => {
                StatusCode::BAD_GATEWAY
            }
            ClientError::Bus(BusError::AddressInUse(_)) | ClientError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
