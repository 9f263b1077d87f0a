//! Chat application module for conversing with the copilot backend.
//!
//! This module provides the conversation layer on top of the client:
//!
//! - Conversation state that starts from a greeting
//! - Slash commands for session control
//! - CLI argument parsing for the `copilot-chat` binary
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Conversation state and backend interaction
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, GREETING, SessionStats};
