use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Message;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatRequest {
    /// The conversation so far, oldest first.
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// Create a request carrying a copy of `messages` in order.
    pub fn new(messages: &[Message]) -> Self {
        Self {
            messages: messages.to_vec(),
        }
    }
}

/// Success body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub reply: String,
}

/// Body of a successful `GET /health`.  The backend is free to answer with JSON or text.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    /// The probe answered with a JSON document.
    Json(Value),

    /// The probe answered with something other than JSON.
    Text(String),
}

impl HealthStatus {
    /// Classify a raw probe body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => HealthStatus::Json(value),
            Err(_) => HealthStatus::Text(body.to_string()),
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Json(value) => write!(f, "{value}"),
            HealthStatus::Text(text) => write!(f, "{text}"),
        }
    }
}
