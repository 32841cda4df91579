//! Terminal session wiring.

use crate::{
    client::ChatClient,
    config::ClientConfig,
    error::ClientError,
    ui::{
        readline::spawn_input_reader,
        terminal::{PROMPT, TerminalDisplay, TerminalStatus},
    },
};

/// Run one chat session in the terminal.
///
/// Returns when the user ends the input (Ctrl+C / Ctrl+D) or the connection
/// goes away. A connection failure during the session is returned as the
/// error.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (input, submissions) = spawn_input_reader(PROMPT);
    let mut client = ChatClient::connect(
        &config,
        Box::new(input),
        Box::new(TerminalDisplay::new()),
        Box::new(TerminalStatus::new()),
    );

    let result = client.run(submissions).await;

    client.into_connection().close().await;
    tracing::info!("Client session ended");

    result
}
