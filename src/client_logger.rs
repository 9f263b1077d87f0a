//! Logging trait for copilot client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log every chat exchange passing through the [`CopilotClient`](crate::CopilotClient).

use crate::{ChatRequest, ChatResponse, Error};

/// A trait for logging copilot client operations.
///
/// Implement this trait to capture chat traffic, for example to keep a transcript outside the
/// process.  Only `post_chat` calls are reported; generic requests and health probes are not.
///
/// # Example
///
/// ```rust,ignore
/// use copilot::{ChatRequest, ChatResponse, ClientLogger, Error};
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &ChatRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &ChatResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Reply: {}", response.reply).unwrap();
///     }
///
///     fn log_error(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Failed: {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing chat request.
    ///
    /// Called once per `post_chat` call, before the first attempt.  Retries are not reported
    /// again.
    fn log_request(&self, request: &ChatRequest);

    /// Log a successful reply.
    fn log_response(&self, response: &ChatResponse);

    /// Log the error a `post_chat` call surfaced to its caller.
    ///
    /// Called once per failed call, after any retry has been exhausted.
    fn log_error(&self, error: &Error);
}
