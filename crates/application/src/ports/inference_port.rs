//! Inference port - Interface for LLM inference

use async_trait::async_trait;
use domain::{ChatMessage, GenerationParams};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Generated response content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Provider that answered
    pub provider: String,
    /// Number of tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Port for inference operations
///
/// Backed either by a single provider or by the fallback chain; callers
/// cannot tell the difference.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Generate a reply to an ordered message list
    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<InferenceResult, ApplicationError>;

    /// Check if the inference backend is reachable
    async fn is_healthy(&self) -> bool;

    /// Models the backend advertises; empty when unknown
    async fn list_models(&self) -> Vec<String>;

    /// Human-readable provider status
    fn status(&self) -> String;

    /// Start over from the primary provider
    fn reset(&self);
}
