//! The chat client.
//!
//! [`ChatClient`] owns one connection and the UI capabilities it renders
//! into. It has one send path (`submit`) and one receive path (the
//! `Message` event), plus explicit hooks for open, close and error.

use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    connection::{CloseInfo, Connection, ConnectionEvent, ConnectionState, WebSocketConnection},
    error::ClientError,
    ui::{DisplaySink, InputSource, Status, StatusIndicator},
};

type OpenHandler = Box<dyn FnMut() + Send>;
type MessageHandler = Box<dyn FnMut(&str) + Send>;
type CloseHandler = Box<dyn FnMut(Option<&CloseInfo>) + Send>;
type ErrorHandler = Box<dyn FnMut(&ClientError) + Send>;

/// Handlers registered through `on_*`, run after the built-in behavior
#[derive(Default)]
struct EventHandlers {
    open: Vec<OpenHandler>,
    message: Vec<MessageHandler>,
    close: Vec<CloseHandler>,
    error: Vec<ErrorHandler>,
}

/// Chat client bound to a single connection
pub struct ChatClient<C: Connection> {
    connection: C,
    input: Box<dyn InputSource>,
    display: Box<dyn DisplaySink>,
    status: Box<dyn StatusIndicator>,
    handlers: EventHandlers,
    last_failure: Option<ClientError>,
}

impl ChatClient<WebSocketConnection> {
    /// Open a WebSocket connection to the configured endpoint and build a
    /// client on top of it.
    ///
    /// The connection starts out `Connecting`; `Open` arrives as an event.
    pub fn connect(
        config: &ClientConfig,
        input: Box<dyn InputSource>,
        display: Box<dyn DisplaySink>,
        status: Box<dyn StatusIndicator>,
    ) -> Self {
        let connection = WebSocketConnection::connect(&config.endpoint_url);
        Self::new(connection, input, display, status)
    }
}

impl<C: Connection> ChatClient<C> {
    /// Build a client around an existing connection and show its current
    /// state on the status indicator.
    pub fn new(
        connection: C,
        input: Box<dyn InputSource>,
        display: Box<dyn DisplaySink>,
        mut status: Box<dyn StatusIndicator>,
    ) -> Self {
        let endpoint = connection.endpoint().clone();
        let initial = match connection.state() {
            ConnectionState::Connecting => Status::Connecting(endpoint),
            ConnectionState::Open => Status::Connected(endpoint),
            ConnectionState::Closed => Status::Disconnected(None),
        };
        status.show(&initial);

        Self {
            connection,
            input,
            display,
            status,
            handlers: EventHandlers::default(),
            last_failure: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The last connection failure seen, if any
    pub fn last_failure(&self) -> Option<&ClientError> {
        self.last_failure.as_ref()
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn on_open(&mut self, handler: impl FnMut() + Send + 'static) {
        self.handlers.open.push(Box::new(handler));
    }

    pub fn on_message(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.handlers.message.push(Box::new(handler));
    }

    pub fn on_close(&mut self, handler: impl FnMut(Option<&CloseInfo>) + Send + 'static) {
        self.handlers.close.push(Box::new(handler));
    }

    pub fn on_error(&mut self, handler: impl FnMut(&ClientError) + Send + 'static) {
        self.handlers.error.push(Box::new(handler));
    }

    /// Send `text` verbatim as one frame, then clear the input.
    ///
    /// A failed send is logged, shown on the status indicator and passed to
    /// the error handlers. The text is handed back to the input so it can be
    /// resent.
    pub fn submit(&mut self, text: &str) -> Result<(), ClientError> {
        match self.connection.send(text) {
            Ok(()) => {
                tracing::debug!("Sent message ({} bytes)", text.len());
                self.input.clear();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to send message: {}", e);
                self.input.restore(text);
                self.report_error(&e);
                Err(e)
            }
        }
    }

    /// Run the built-in behavior and the registered handlers for `event`.
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Open => {
                let endpoint = self.connection.endpoint().clone();
                tracing::info!("WebSocket connected to {}", endpoint);
                self.status.show(&Status::Connected(endpoint));
                for handler in &mut self.handlers.open {
                    handler();
                }
            }
            ConnectionEvent::Message(payload) => {
                tracing::info!("Message received: {}", payload);
                self.display.append(&payload);
                for handler in &mut self.handlers.message {
                    handler(&payload);
                }
            }
            ConnectionEvent::Close(info) => {
                tracing::info!("WebSocket closed");
                self.status.show(&Status::Disconnected(info.clone()));
                for handler in &mut self.handlers.close {
                    handler(info.as_ref());
                }
            }
            ConnectionEvent::Error(error) => {
                tracing::error!("{}", error);
                self.report_error(&error);
                self.last_failure = Some(error);
            }
        }
    }

    fn report_error(&mut self, error: &ClientError) {
        self.status.show(&Status::Failed(error.to_string()));
        for handler in &mut self.handlers.error {
            handler(error);
        }
    }

    /// Wait for one connection event and handle it.
    ///
    /// Returns `false` once the connection has no more events.
    pub async fn handle_next_event(&mut self) -> bool {
        match self.connection.next_event().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Event loop over form submissions and connection events.
    ///
    /// Each event is handled to completion before the next one is taken.
    /// Returns when the submissions channel closes or the connection has no
    /// more events. A connection failure seen along the way is returned as
    /// the error; send failures are reported but do not end the loop.
    pub async fn run(
        &mut self,
        mut submissions: mpsc::UnboundedReceiver<String>,
    ) -> Result<(), ClientError> {
        loop {
            tokio::select! {
                submission = submissions.recv() => match submission {
                    Some(text) => {
                        // Already reported by submit
                        let _ = self.submit(&text);
                    }
                    None => {
                        tracing::info!("Input closed");
                        break;
                    }
                },
                event = self.connection.next_event() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        tracing::debug!("Connection has no more events");
                        break;
                    }
                },
            }
        }

        match self.last_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
