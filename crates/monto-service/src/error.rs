//! Service-side error types.

use std::io;

use monto_core::ProductDescriptor;
use thiserror::Error;

/// Result type for service operations.
pub type ServeResult<T> = Result<T, ServeError>;

/// Errors that can occur while configuring or running a service.
#[derive(Debug, Error)]
pub enum ServeError {
    /// IO error (listener, stream).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Framing or transport error on a broker connection.
    #[error("protocol error: {0}")]
    Protocol(#[from] monto_protocol::ProtocolError),

    /// Hello negotiation with a broker failed.
    #[error("negotiation failed: {0}")]
    Handshake(#[from] monto_protocol::HandshakeError),

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A provider is already registered for this capability.
    #[error("a provider is already registered for {0}")]
    DuplicateCapability(ProductDescriptor),
}

impl ServeError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
