//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Inference/AI error
    #[error("Inference error: {0}")]
    Inference(String),

    /// The provider rejected the request for quota, billing or rate reasons
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Every provider in the fallback chain failed, in attempt order
    #[error("All providers failed: {}", .attempts.join("; "))]
    ProvidersExhausted { attempts: Vec<String> },

    /// Voice capture, transcription or playback error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if a later attempt may succeed without operator action
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::ProvidersExhausted { .. })
    }
}
