//! Tayori chat client.
//!
//! A minimal WebSocket chat client: one connection, one send path, one
//! receive path. Submitted text goes out as raw text frames and incoming
//! text frames are appended to a display sink verbatim.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod runner;
pub mod ui;

pub use client::ChatClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT_URL, EndpointUrl};
pub use connection::{CloseInfo, Connection, ConnectionEvent, ConnectionState, WebSocketConnection};
pub use error::ClientError;
pub use runner::run_client;
