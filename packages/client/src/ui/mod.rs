//! UI boundary consumed by the chat client.
//!
//! The client only needs three capabilities from its surroundings: an input
//! it can reset after a submission, a sink it can append messages to, and a
//! status indicator for connection state and failures.

pub mod readline;
pub mod terminal;

use std::fmt;

use crate::{config::EndpointUrl, connection::CloseInfo};

/// Input field that submissions come from
#[cfg_attr(test, mockall::automock)]
pub trait InputSource: Send {
    /// Reset the field to empty after its value was submitted
    fn clear(&mut self);

    /// Put back a submitted value that could not be sent
    fn restore(&mut self, text: &str);
}

/// Element that incoming messages are appended to
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink: Send {
    /// Append one display node whose text is `text`, verbatim
    fn append(&mut self, text: &str);
}

/// User-visible connection status
#[cfg_attr(test, mockall::automock)]
pub trait StatusIndicator: Send {
    fn show(&mut self, status: &Status);
}

/// What the status indicator is asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Connecting(EndpointUrl),
    Connected(EndpointUrl),
    Disconnected(Option<CloseInfo>),
    Failed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Connecting(url) => write!(f, "connecting to {}", url),
            Status::Connected(url) => write!(f, "connected to {}", url),
            Status::Disconnected(None) => write!(f, "disconnected"),
            Status::Disconnected(Some(info)) if info.reason.is_empty() => {
                write!(f, "disconnected (code {})", info.code)
            }
            Status::Disconnected(Some(info)) => {
                write!(f, "disconnected (code {}: {})", info.code, info.reason)
            }
            Status::Failed(reason) => write!(f, "error: {}", reason),
        }
    }
}
