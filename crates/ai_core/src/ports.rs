//! Port definitions for inference engines
//!
//! Every provider client and the fallback engine implement [`InferenceEngine`],
//! so callers never need to know which backend answered.

use async_trait::async_trait;
use domain::{ChatMessage, GenerationParams};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::provider::ProviderKind;

/// Request for inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Messages in the conversation, oldest first
    pub messages: Vec<InferenceMessage>,
    /// Model to use (overrides config default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the inference request (OpenAI-compatible format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceMessage {
    pub role: String,
    pub content: String,
}

impl InferenceMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for InferenceMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self::new(msg.role().as_str(), msg.content())
    }
}

impl InferenceRequest {
    /// Build a request from domain messages
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        Self {
            messages: messages.iter().map(InferenceMessage::from).collect(),
            model: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Create a simple single-turn request
    pub fn simple(user_message: impl Into<String>) -> Self {
        Self {
            messages: vec![InferenceMessage::new("user", user_message)],
            model: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the model for this request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set temperature
    #[must_use]
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set the completion length limit
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Apply validated generation parameters
    #[must_use]
    pub const fn with_params(self, params: &GenerationParams) -> Self {
        self.with_max_tokens(params.max_tokens())
            .with_temperature(params.temperature())
    }
}

/// Response from inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated content, trimmed
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Provider that answered
    pub provider: ProviderKind,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for inference engine implementations
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a complete response
    async fn generate(&self, request: InferenceRequest)
    -> Result<InferenceResponse, InferenceError>;

    /// Check if the engine is reachable; never fails
    async fn health_check(&self) -> bool;

    /// Models the backend advertises; empty when it cannot be reached
    async fn list_models(&self) -> Vec<String>;

    /// Short engine name for logs
    fn name(&self) -> &str;

    /// Model used when a request does not name one
    fn default_model(&self) -> String;

    /// Human-readable description of the engine's current state
    fn status(&self) -> String {
        format!("{} ({})", self.name(), self.default_model())
    }

    /// Return to the initial state; stateless engines do nothing
    fn reset(&self) {}
}
