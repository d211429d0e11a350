//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the broker.
    #[error("connection error: {0}")]
    Connection(String),

    /// Hello negotiation failed; no session was established.
    #[error("negotiation failed: {0}")]
    Handshake(#[from] monto_protocol::HandshakeError),

    /// Framing or transport error on an established session.
    #[error("protocol error: {0}")]
    Protocol(#[from] monto_protocol::ProtocolError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
