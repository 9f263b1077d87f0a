//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the configuration
//! structure for the chat front end.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::config::ClientConfig;

/// Command-line arguments for the copilot-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Explicit API base URL.
    #[arrrg(optional, "API base URL (default: $COPILOT_API_BASE_URL or http://localhost:3001)", "URL")]
    pub base_url: Option<String>,

    /// Per-attempt request deadline in milliseconds.
    #[arrrg(optional, "Request timeout in milliseconds (default: 15000)", "MS")]
    pub timeout_ms: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for the chat front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Configuration handed to the client.
    pub client: ClientConfig,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            client: ClientConfig::new(),
            use_color: true,
        }
    }

    /// Layers command-line arguments over `client`, typically [`ClientConfig::from_env`].
    pub fn from_args(args: ChatArgs, client: ClientConfig) -> Self {
        let mut client = client;
        if let Some(base_url) = args.base_url.filter(|b| !b.trim().is_empty()) {
            client = client.with_base_url(base_url);
        }
        if let Some(ms) = args.timeout_ms {
            client = client.with_timeout(Duration::from_millis(ms));
        }
        Self {
            client,
            use_color: !args.no_color,
        }
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig::from_args(args, ClientConfig::new())
    }
}
