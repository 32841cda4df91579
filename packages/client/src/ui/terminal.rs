//! Terminal implementations of the UI boundary.
//!
//! Messages go to stdout, one per line. Status lines go to stderr with a
//! timestamp. Both redisplay the input prompt afterwards, since printing
//! overwrites the line the user is typing on.

use std::io::Write;

use chrono::Local;
use tayori_shared::time::{Clock, SystemClock, format_clock_time};

use super::{DisplaySink, Status, StatusIndicator};

/// Prompt shown in front of the input line
pub const PROMPT: &str = "> ";

/// Redisplay the prompt after printing above it
fn redisplay_prompt(out: &mut impl Write) {
    write!(out, "{}", PROMPT).ok();
    out.flush().ok();
}

/// Prints each message on its own line of stdout
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for TerminalDisplay {
    fn append(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        write!(out, "\r{}\n", text).ok();
        redisplay_prompt(&mut out);
    }
}

/// Prints timestamped status lines to stderr
pub struct TerminalStatus<C: Clock = SystemClock> {
    clock: C,
}

impl TerminalStatus<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TerminalStatus<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TerminalStatus<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    fn format_line(&self, status: &Status) -> String {
        let time = format_clock_time(self.clock.now_millis(), &Local);
        format!("[{}] * {}", time, status)
    }
}

impl<C: Clock> StatusIndicator for TerminalStatus<C> {
    fn show(&mut self, status: &Status) {
        let line = self.format_line(status);
        let mut err = std::io::stderr().lock();
        write!(err, "\r{}\n", line).ok();
        redisplay_prompt(&mut err);
    }
}
