//! Chat session management.

use crate::client::{ChatOptions, CopilotClient};
use crate::error::Result;
use crate::observability::{CHAT_TURN_ERRORS, CHAT_TURNS};
use crate::types::{HealthStatus, Message};

/// The assistant's opening line of every conversation.
pub const GREETING: &str = "Hi! I'm your AI Copilot. How can I help today?";

/// A chat session that owns the conversation and forwards it to the backend.
///
/// `send` borrows the session mutably, so a session never has more than one chat call
/// outstanding; input is effectively disabled until the reply or error comes back.
#[derive(Debug)]
pub struct ChatSession {
    client: CopilotClient,
    options: ChatOptions,
    messages: Vec<Message>,
    turns: u64,
    failed_turns: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Base URL the session talks to.
    pub base_url: String,
    /// The number of messages in the conversation, greeting included.
    pub message_count: usize,
    /// Turns sent since the session was created.
    pub turns: u64,
    /// Turns that ended in an error.
    pub failed_turns: u64,
}

impl ChatSession {
    /// Creates a new chat session starting from the greeting.
    pub fn new(client: CopilotClient) -> Self {
        Self::with_options(client, ChatOptions::default())
    }

    /// Creates a new chat session whose calls use `options`.
    pub fn with_options(client: CopilotClient, options: ChatOptions) -> Self {
        Self {
            client,
            options,
            messages: vec![Message::assistant(GREETING)],
            turns: 0,
            failed_turns: 0,
        }
    }

    /// Sends `text` as the next user turn.
    ///
    /// Blank input is ignored and yields `Ok(None)`.  Otherwise the user message is appended
    /// and the whole conversation is forwarded.  On success the reply is appended and returned.
    /// On failure the user message stays in the conversation, no reply is appended, and the
    /// error is returned for display.
    pub async fn send(&mut self, text: &str) -> Result<Option<Message>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.messages.push(Message::user(text));
        self.turns += 1;
        CHAT_TURNS.click();

        match self
            .client
            .post_chat_with(&self.messages, &self.options)
            .await
        {
            Ok(response) => {
                let reply = Message::assistant(response.reply);
                self.messages.push(reply.clone());
                Ok(Some(reply))
            }
            Err(err) => {
                self.failed_turns += 1;
                CHAT_TURN_ERRORS.click();
                Err(err)
            }
        }
    }

    /// Starts over from the greeting.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.messages.push(Message::assistant(GREETING));
    }

    /// Probes the backend this session chats with.
    pub async fn health(&self) -> Result<HealthStatus> {
        let options = ChatOptions {
            base_url: self.options.base_url.clone(),
            timeout: None,
        };
        self.client.health_check_with(&options).await
    }

    /// The conversation so far, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns session statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            base_url: self
                .options
                .base_url
                .clone()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| self.client.base_url().to_string()),
            message_count: self.messages.len(),
            turns: self.turns,
            failed_turns: self.failed_turns,
        }
    }
}
