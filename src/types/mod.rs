// Public modules
pub mod chat;
pub mod message;

// Re-exports
pub use chat::{ChatRequest, ChatResponse, HealthStatus};
pub use message::{Message, Role};
