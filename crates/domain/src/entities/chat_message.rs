//! Chat message entity

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Role of the message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt or instruction
    System,
    /// Message from the user
    User,
    /// Message from the assistant
    Assistant,
}

impl MessageRole {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A single message in a conversation
///
/// Messages are immutable once built; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    role: MessageRole,
    content: String,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message, stamping it with the current time when no timestamp is given
    pub fn new(
        role: MessageRole,
        content: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: created_at.unwrap_or_else(Utc::now),
        }
    }

    /// Create a message from an untyped role name
    pub fn parse(role: &str, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self::new(role.parse()?, content, None))
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, None)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, None)
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content, None)
    }

    /// Unique message identifier
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Role of the sender
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Message content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the message was created
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
