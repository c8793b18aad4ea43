//! Domain entities - Objects with identity and lifecycle

mod chat_message;

pub use chat_message::{ChatMessage, MessageRole};
