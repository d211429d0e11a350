//! Protocol error types.

use std::io;

use monto_core::{Identifier, ProtocolVersion};
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while framing or transporting messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message exceeds the maximum allowed size.
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: u32, max: u32 },

    /// Failed to serialize or deserialize a message.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A frame declared a zero-length payload.
    #[error("empty message")]
    EmptyMessage,

    /// A buffer ended before the declared frame length.
    #[error("incomplete message: expected {expected} bytes, got {received}")]
    IncompleteMessage { expected: usize, received: usize },

    /// The connection was closed locally; no further sends or receives.
    #[error("connection is closed")]
    ConnectionClosed,

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that end hello negotiation.
///
/// Every variant is terminal for the connection it occurred on: the caller
/// must discard the connection and may retry by opening a new one.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The stream faulted before negotiation completed.
    #[error("IO error during negotiation: {0}")]
    Io(#[source] io::Error),

    /// The broker speaks an incompatible protocol version.
    #[error("protocol version mismatch: we speak {local}, broker speaks {broker}")]
    VersionMismatch {
        local: ProtocolVersion,
        broker: ProtocolVersion,
    },

    /// A required extension is not in the broker's supported set.
    #[error("broker does not support required extension {0}")]
    MissingRequiredExtension(Identifier),

    /// The broker's hello frame violated the expected schema.
    #[error("malformed hello frame: {0}")]
    MalformedHello(String),
}
