//! Client configuration.

use std::env;
use std::time::Duration;

use crate::endpoint;

/// Environment variable holding an explicit API base URL.
pub const BASE_URL_ENV: &str = "COPILOT_API_BASE_URL";

/// Environment variable holding the origin the front end is served from.
pub const ORIGIN_ENV: &str = "COPILOT_ORIGIN";

/// Default deadline for a chat or generic request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Default deadline for the health probe.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Pause between a transient failure and the single retry.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(300);

/// Configuration injected into a [`CopilotClient`](crate::CopilotClient) at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit API base URL.  Empty or `None` means "resolve automatically".
    pub base_url: Option<String>,

    /// Origin the front end is served from, used for same-origin resolution.
    pub origin: Option<String>,

    /// Deadline applied to each attempt of a chat or generic request.
    pub timeout: Duration,

    /// Deadline applied to each attempt of the health probe.
    pub health_timeout: Duration,

    /// Pause before the retry of a transient failure.
    pub retry_backoff: Duration,
}

impl ClientConfig {
    /// Creates a new ClientConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: resolved automatically
    /// - Timeout: 15 s
    /// - Health timeout: 5 s
    /// - Retry backoff: 300 ms
    pub fn new() -> Self {
        Self {
            base_url: None,
            origin: None,
            timeout: DEFAULT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Creates a ClientConfig from `COPILOT_API_BASE_URL` and `COPILOT_ORIGIN`.
    ///
    /// Unset, empty, or non-unicode variables count as absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Creates a ClientConfig from `lookup`, which maps a variable name to its value.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            base_url: read(BASE_URL_ENV),
            origin: read(ORIGIN_ENV),
            ..Self::new()
        }
    }

    /// Sets the explicit base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the hosting origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the per-attempt request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-attempt health probe deadline.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Sets the pause before a retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// The base URL this configuration resolves to.
    pub fn resolve_base_url(&self) -> String {
        endpoint::resolve_base_url(self.base_url.as_deref(), self.origin.as_deref())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
