//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the backend.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start over from the greeting.
    NewChat,

    /// Probe the backend's health endpoint.
    Health,

    /// Print the conversation so far.
    History,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be sent as a regular message.
///
/// # Examples
///
/// ```
/// # use copilot::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/new"), Some(ChatCommand::NewChat));
/// assert!(parse_command("Hello, Copilot!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" => ChatCommand::NewChat,
        "health" => ChatCommand::Health,
        "history" => ChatCommand::History,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    match (result, argument) {
        (ChatCommand::Invalid(message), _) => Some(ChatCommand::Invalid(message)),
        (_, Some(_)) => Some(ChatCommand::Invalid(format!(
            "/{} does not take an argument",
            command
        ))),
        (result, None) => Some(result),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new chat (alias: /clear)
  /health                Check that the backend is reachable
  /history               Show the conversation so far
  /help                  Show this help message
  /quit                  Exit the chat"#
}
