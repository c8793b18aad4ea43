//! Application services - Use case implementations

mod conversation_service;

pub use conversation_service::{
    ConversationService, DEFAULT_MAX_HISTORY_TURNS, DEFAULT_SYSTEM_PROMPT, ProcessMessageInput,
    ProcessMessageOutput,
};
