//! WebSocket implementation of [`Connection`].
//!
//! ## Responsibilities
//!
//! - Perform the handshake in the background so that `connect` returns a
//!   handle in the `Connecting` state straight away
//! - Turn incoming frames into [`ConnectionEvent`]s
//! - Write queued outgoing text as frames, in queue order
//!
//! The socket is owned by a single tokio task. The handle talks to it over
//! two unbounded channels, one per direction.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::{CloseFrame, Message},
};

use super::{CloseInfo, Connection, ConnectionEvent, ConnectionState, next_state};
use crate::{config::EndpointUrl, error::ClientError};

/// Upper bound on waiting for the socket task when closing
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle to a WebSocket connection driven by a background task
pub struct WebSocketConnection {
    url: EndpointUrl,
    state: ConnectionState,
    outgoing: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
    driver: JoinHandle<()>,
}

impl WebSocketConnection {
    /// Start connecting to `url`.
    ///
    /// Returns immediately; the handshake result arrives later as an
    /// `Open` event, or as `Error` followed by `Close`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(url: &EndpointUrl) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tracing::info!("Connecting to {}", url);
        let driver = tokio::spawn(drive(url.clone(), outgoing_rx, event_tx));

        Self {
            url: url.clone(),
            state: ConnectionState::Connecting,
            outgoing: outgoing_tx,
            events: event_rx,
            driver,
        }
    }

    /// Close the connection and wait for the socket task to finish.
    pub async fn close(self) {
        let Self {
            url,
            outgoing,
            mut driver,
            ..
        } = self;

        // The socket task sends a close frame once the queue is closed.
        drop(outgoing);

        if tokio::time::timeout(CLOSE_TIMEOUT, &mut driver).await.is_err() {
            tracing::warn!("Connection to {} did not close in time, aborting", url);
            driver.abort();
        } else {
            tracing::debug!("Connection to {} closed", url);
        }
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    fn endpoint(&self) -> &EndpointUrl {
        &self.url
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn send(&mut self, text: &str) -> Result<(), ClientError> {
        if self.state != ConnectionState::Open {
            return Err(ClientError::SendFailure { state: self.state });
        }

        self.outgoing
            .send(text.to_string())
            .map_err(|_| ClientError::SendFailure {
                state: ConnectionState::Closed,
            })
    }

    async fn next_event(&mut self) -> Option<ConnectionEvent> {
        let event = self.events.recv().await?;
        self.state = next_state(self.state, &event);
        Some(event)
    }
}

fn close_info(frame: Option<CloseFrame>) -> Option<CloseInfo> {
    frame.map(|frame| CloseInfo {
        code: u16::from(frame.code),
        reason: frame.reason.as_str().to_string(),
    })
}

/// Socket task: handshake, then pump frames until either side goes away.
async fn drive(
    url: EndpointUrl,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
) {
    // A send error only means the handle was dropped; the loop below notices
    // that through the outgoing queue closing.
    let emit = |event: ConnectionEvent| {
        let _ = events.send(event);
    };

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, response)) => {
            tracing::debug!("Handshake with {} completed ({})", url, response.status());
            ws_stream
        }
        Err(e) => {
            tracing::warn!("Failed to connect to {}: {}", url, e);
            emit(ConnectionEvent::Error(ClientError::ConnectionFailure(
                e.to_string(),
            )));
            emit(ConnectionEvent::Close(None));
            return;
        }
    };

    emit(ConnectionEvent::Open);
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(ConnectionEvent::Message(text.as_str().to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection");
                    // tungstenite queues the close reply; it goes out on flush
                    if let Err(e) = write.flush().await {
                        tracing::debug!("Failed to reply to close frame: {}", e);
                    }
                    emit(ConnectionEvent::Close(close_info(frame)));
                    break;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    emit(ConnectionEvent::Error(ClientError::ConnectionFailure(
                        e.to_string(),
                    )));
                    emit(ConnectionEvent::Close(None));
                    break;
                }
                None => {
                    emit(ConnectionEvent::Close(None));
                    break;
                }
            },
            text = outgoing.recv() => match text {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        emit(ConnectionEvent::Error(ClientError::ConnectionFailure(
                            e.to_string(),
                        )));
                        emit(ConnectionEvent::Close(None));
                        break;
                    }
                }
                None => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    emit(ConnectionEvent::Close(None));
                    break;
                }
            },
        }
    }
}
