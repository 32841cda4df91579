//! Connection abstraction.
//!
//! `ChatClient` talks to its transport only through the [`Connection`]
//! trait. The concrete implementation is [`WebSocketConnection`].

pub mod websocket;

use std::fmt;

use async_trait::async_trait;

use crate::{config::EndpointUrl, error::ClientError};

pub use websocket::WebSocketConnection;

/// Lifecycle of a connection: `Connecting -> Open -> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Close code and reason carried by a close frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
}

/// Notification delivered by a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake completed
    Open,
    /// Text frame received
    Message(String),
    /// Connection closed, with the peer's close frame if there was one
    Close(Option<CloseInfo>),
    /// Transport failure; always followed by `Close`
    Error(ClientError),
}

/// A duplex text channel to the chat endpoint
#[async_trait]
pub trait Connection: Send {
    /// Endpoint this connection was opened to
    fn endpoint(&self) -> &EndpointUrl;

    /// Current lifecycle state
    fn state(&self) -> ConnectionState;

    /// Queue one outgoing text frame.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::SendFailure` if the connection is not open.
    fn send(&mut self, text: &str) -> Result<(), ClientError>;

    /// Wait for the next event, updating the state accordingly.
    ///
    /// Returns `None` once the transport is gone and no events remain.
    async fn next_event(&mut self) -> Option<ConnectionEvent>;
}

/// Apply the state transition caused by `event`.
pub(crate) fn next_state(current: ConnectionState, event: &ConnectionEvent) -> ConnectionState {
    match event {
        ConnectionEvent::Open => ConnectionState::Open,
        ConnectionEvent::Close(_) => ConnectionState::Closed,
        ConnectionEvent::Message(_) | ConnectionEvent::Error(_) => current,
    }
}
