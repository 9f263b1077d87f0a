// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{CHAT_PATH, ChatOptions, CopilotClient, HEALTH_PATH, RequestOptions};
pub use client_logger::ClientLogger;
pub use config::ClientConfig;
pub use endpoint::{DEFAULT_BASE_URL, build_url, resolve_base_url};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::{ChatRequest, ChatResponse, HealthStatus, Message, Role};
