//! Normalization of error bodies.
//!
//! Backends report failures in more than one shape:
//!
//! ```json
//! {"error": {"code": "rate_limited", "message": "Slow down"}}
//! {"message": "Slow down"}
//! {"detail": "Slow down"}
//! {"error": "Slow down"}
//! ```
//!
//! Each shape is a rule: a JSON pointer into the body.  Rules are tried in order and the first
//! one that lands on a non-empty string wins.

use serde_json::Value;

use crate::error::{CODE_GATEWAY_TIMEOUT, CODE_HTTP_ERROR};

/// Where to look for a human-readable message, in priority order.
pub const MESSAGE_RULES: &[&str] = &["/error/message", "/message", "/detail", "/error"];

/// Where to look for a symbolic code, in priority order.
pub const CODE_RULES: &[&str] = &["/error/code", "/code"];

/// Apply `rules` to `body` and return the first non-empty string found.
pub fn first_match<'a>(body: &'a Value, rules: &[&str]) -> Option<&'a str> {
    rules
        .iter()
        .filter_map(|rule| body.pointer(rule))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
}

/// The message to report for a failed response.
pub fn error_message(status: u16, body: Option<&Value>) -> String {
    body.and_then(|b| first_match(b, MESSAGE_RULES))
        .map(String::from)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

/// The code to report for a failed response.
pub fn error_code(status: u16, body: Option<&Value>) -> String {
    if let Some(code) = body.and_then(|b| first_match(b, CODE_RULES)) {
        return code.to_string();
    }
    if status == 504 {
        CODE_GATEWAY_TIMEOUT.to_string()
    } else {
        CODE_HTTP_ERROR.to_string()
    }
}
