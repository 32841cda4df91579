//! Error types for the chat client.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The endpoint could not be reached, the handshake failed or the
    /// connection broke while open
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// A message was submitted while the connection was not open
    #[error("Cannot send while the connection is {state}")]
    SendFailure { state: ConnectionState },

    /// The endpoint configuration is invalid
    #[error("Malformed configuration: {0}")]
    MalformedConfiguration(String),
}

impl ClientError {
    /// Whether the client must stop instead of reporting and carrying on.
    ///
    /// Only configuration errors are fatal; they are raised before any
    /// connection exists.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::MalformedConfiguration(_))
    }
}
