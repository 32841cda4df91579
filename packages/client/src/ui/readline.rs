//! Line input via rustyline.
//!
//! rustyline blocks, so it runs on its own OS thread and hands every entered
//! line to the async side over an unbounded channel. Each line is one form
//! submission.
//!
//! After handing a line over, the thread waits until the client has either
//! cleared the field or handed the text back. The next prompt starts from
//! that text, so a message that could not be sent is still on the input
//! line.

use std::sync::mpsc as std_mpsc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use super::InputSource;

/// The readline input line seen as an input field
#[derive(Debug)]
pub struct TerminalInput {
    kept: std_mpsc::Sender<String>,
}

impl InputSource for TerminalInput {
    fn clear(&mut self) {
        // The reader thread is gone once the input has ended
        let _ = self.kept.send(String::new());
    }

    fn restore(&mut self, text: &str) {
        tracing::debug!("Keeping unsent input ({} bytes)", text.len());
        let _ = self.kept.send(text.to_string());
    }
}

/// Spawn the input thread.
///
/// Returns the input field and the channel of submitted lines. Lines are
/// forwarded unmodified, empty lines included. The channel closes on Ctrl+C,
/// Ctrl+D, a readline error, or when either end is dropped.
pub fn spawn_input_reader(prompt: &str) -> (TerminalInput, mpsc::UnboundedReceiver<String>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let (kept_tx, kept_rx) = std_mpsc::channel::<String>();
    let prompt = prompt.to_string();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        read_lines(
            |initial| {
                let line = rl.readline_with_initial(&prompt, (initial, ""))?;
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str()).ok();
                }
                Ok(line)
            },
            &input_tx,
            &kept_rx,
        );
    });

    (TerminalInput { kept: kept_tx }, input_rx)
}

/// Submission loop of the input thread.
///
/// `read` is given the text the line starts with and blocks until the user
/// submits.
fn read_lines(
    mut read: impl FnMut(&str) -> Result<String, ReadlineError>,
    input_tx: &mpsc::UnboundedSender<String>,
    kept_rx: &std_mpsc::Receiver<String>,
) {
    let mut kept = String::new();

    loop {
        match read(&kept) {
            Ok(line) => {
                if input_tx.send(line).is_err() {
                    // Receiver gone, exit thread
                    break;
                }
                match kept_rx.recv() {
                    Ok(text) => kept = text,
                    // Input field dropped
                    Err(_) => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                tracing::info!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                tracing::info!("EOF");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {}", err);
                break;
            }
        }
    }
}
