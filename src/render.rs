//! Output rendering for the chat front end.
//!
//! This module provides the renderer trait and a plain-text implementation that writes a
//! conversation to a terminal, optionally with ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Message, Role};

/// ANSI escape code for dim text (used for system messages and the pending marker).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering a conversation.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print one message of the conversation.
    fn print_message(&mut self, message: &Message);

    /// Print an error for the user.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called while a reply is outstanding.
    fn print_pending(&mut self) {}
}

/// Renderer that writes plain text, with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer on stdout with color enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a renderer on stdout with the given color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer on an arbitrary writer.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn emit(&mut self, text: &str) {
        // Terminal output is best-effort; a closed pipe should not end the session.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_message(&mut self, message: &Message) {
        let (label, color) = match message.role {
            Role::User => ("You", ""),
            Role::Assistant => ("Copilot", ANSI_CYAN),
            Role::System => ("System", ANSI_DIM),
        };
        let line = format!(
            "{}{}{label}:{} {}",
            self.style(ANSI_BOLD),
            self.style(color),
            self.style(ANSI_RESET),
            message.content
        );
        self.emit(&line);
    }

    fn print_error(&mut self, error: &str) {
        let line = format!(
            "{}Error: {error}{}",
            self.style(ANSI_RED),
            self.style(ANSI_RESET)
        );
        self.emit(&line);
    }

    fn print_info(&mut self, info: &str) {
        self.emit(info);
    }

    fn print_pending(&mut self) {
        let line = format!("{}Copilot is thinking…{}", self.style(ANSI_DIM), self.style(ANSI_RESET));
        self.emit(&line);
    }
}
