//! Error types for the copilot client.
//!
//! Every failure path of the client surfaces as an [`Error`].  Callers that only want to show
//! something to a user can rely on [`Error::message`]; callers that branch on failure class use
//! [`Error::code`], [`Error::status`] and [`Error::details`].

use std::error;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Code reported for a request that exceeded its deadline.
pub const CODE_TIMEOUT: &str = "timeout";
/// Code reported for a transport failure.
pub const CODE_NETWORK: &str = "network";
/// Code reported for a non-success status with no code in the body.
pub const CODE_HTTP_ERROR: &str = "http_error";
/// Code reported for a 504 with no code in the body.
pub const CODE_GATEWAY_TIMEOUT: &str = "gateway_timeout";
/// Code reported for a body that could not be (de)serialized.
pub const CODE_SERIALIZATION: &str = "serialization";
/// Code reported for a URL that cannot be requested.
pub const CODE_URL: &str = "url";
/// Code reported when the HTTP client itself cannot be constructed.
pub const CODE_HTTP_CLIENT: &str = "http_client";

/// The main error type for the copilot client.
#[derive(Clone, Debug)]
pub enum Error {
    /// The request did not complete before its deadline.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// Transport-level failure: connection refused, reset, DNS, and the like.
    Network {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The server answered with a non-success status.
    Http {
        /// HTTP status code.
        status_code: u16,
        /// Symbolic code, either forwarded from the body or derived from the status.
        code: String,
        /// Human-readable error message.
        message: String,
        /// The parsed error body, when it was JSON.
        details: Option<Value>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL that cannot be requested.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// HTTP client construction error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new network error.
    pub fn network(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Network {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP status error.
    pub fn http(
        status_code: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        Error::Http {
            status_code,
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// The symbolic failure category.
    pub fn code(&self) -> &str {
        match self {
            Error::Timeout { .. } => CODE_TIMEOUT,
            Error::Network { .. } => CODE_NETWORK,
            Error::Http { code, .. } => code.as_str(),
            Error::Serialization { .. } => CODE_SERIALIZATION,
            Error::Url { .. } => CODE_URL,
            Error::HttpClient { .. } => CODE_HTTP_CLIENT,
        }
    }

    /// The message meant for display, without the variant prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Error::Timeout { message, .. }
            | Error::Network { message, .. }
            | Error::Http { message, .. }
            | Error::Serialization { message, .. }
            | Error::Url { message, .. }
            | Error::HttpClient { message, .. } => message.as_str(),
        }
    }

    /// The HTTP status, or 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Error::Http { status_code, .. } => *status_code,
            _ => 0,
        }
    }

    /// The parsed error body, if the server sent JSON.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Http { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a network error.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Returns true if this error carries an HTTP status.
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    /// Returns true if this error is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Http { status_code, .. } if *status_code >= 500)
    }

    /// Returns true if an immediate retry is likely to succeed.
    ///
    /// Anything coded `timeout` qualifies, whether the deadline expired locally or the server
    /// reported it in the error body; so do transport failures and 5xx responses.  Local
    /// failures (bad URL, unparsable body, client construction) would fail the same way again
    /// and do not.
    pub fn is_transient(&self) -> bool {
        self.code() == CODE_TIMEOUT || self.is_network() || self.is_server_error()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Network { message, .. } => {
                write!(f, "Network error: {message}")
            }
            Error::Http {
                status_code,
                code,
                message,
                ..
            } => {
                write!(f, "{code} ({status_code}): {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Network { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for copilot operations.
pub type Result<T> = std::result::Result<T, Error>;
