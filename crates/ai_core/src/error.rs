//! Inference errors

use std::fmt;

use thiserror::Error;

use crate::provider::ProviderKind;

/// Message fragments that mark a failure as quota-related (matched case-insensitively)
pub const QUOTA_INDICATORS: [&str; 6] = [
    "quota",
    "insufficient_quota",
    "rate_limit",
    "billing",
    "payment",
    "429",
];

/// Check a failure message against [`QUOTA_INDICATORS`]
#[must_use]
pub fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

/// One failed provider attempt inside a fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    /// Provider that was tried
    pub provider: ProviderKind,
    /// Error message it produced
    pub message: String,
}

impl FailedAttempt {
    /// Record a failure
    pub fn new(provider: ProviderKind, error: &InferenceError) -> Self {
        Self {
            provider,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.provider, self.message)
    }
}

fn join_attempts(attempts: &[FailedAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Network, connection or timeout failure reaching the provider
    #[error("{provider}: connection failed: {message}")]
    Transport {
        provider: ProviderKind,
        message: String,
    },

    /// Invalid or missing credential
    #[error("{provider}: authentication failed: {message}")]
    Auth {
        provider: ProviderKind,
        message: String,
    },

    /// Rate limit, billing or capacity exhaustion
    #[error("{provider}: quota exceeded: {message}")]
    Quota {
        provider: ProviderKind,
        message: String,
    },

    /// Any other non-success HTTP status
    #[error("{provider}: server error (status {status}): {message}")]
    Server {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// Malformed or unexpected response body
    #[error("{provider}: invalid response: {message}")]
    Protocol {
        provider: ProviderKind,
        message: String,
    },

    /// Every provider in the fallback chain failed
    #[error("All providers failed: {}", join_attempts(.0))]
    Exhausted(Vec<FailedAttempt>),

    /// Engine could not be built from its configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Map a reqwest transport failure onto a provider error
    pub(crate) fn transport(provider: ProviderKind, err: reqwest::Error, timeout_ms: u64) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out after {timeout_ms}ms")
        } else if err.is_connect() {
            format!("could not connect: {}", err.without_url())
        } else {
            err.without_url().to_string()
        };
        Self::Transport { provider, message }
    }

    /// Provider that produced the error, if it came from a single provider
    #[must_use]
    pub const fn provider(&self) -> Option<ProviderKind> {
        match self {
            Self::Transport { provider, .. }
            | Self::Auth { provider, .. }
            | Self::Quota { provider, .. }
            | Self::Server { provider, .. }
            | Self::Protocol { provider, .. } => Some(*provider),
            Self::Exhausted(_) | Self::Configuration(_) => None,
        }
    }

    /// Whether this failure should trigger a switch to the next provider
    ///
    /// Structured quota errors always qualify. Vendor responses are matched
    /// on their message; transport failures never are.
    #[must_use]
    pub fn is_quota_class(&self) -> bool {
        match self {
            Self::Quota { .. } => true,
            Self::Auth { message, .. }
            | Self::Server { message, .. }
            | Self::Protocol { message, .. } => is_quota_message(message),
            Self::Transport { .. } | Self::Exhausted(_) | Self::Configuration(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_indicators_match_case_insensitively() {
        assert!(is_quota_message("RATE_LIMIT reached"));
        assert!(is_quota_message("Insufficient_Quota"));
        assert!(is_quota_message("HTTP 429"));
        assert!(is_quota_message("Billing hard limit"));
        assert!(is_quota_message("Payment required"));
    }

    #[test]
    fn plain_request_errors_are_not_quota() {
        assert!(!is_quota_message("invalid request"));
        assert!(!is_quota_message("invalid_api_key"));
        assert!(!is_quota_message(""));
    }

    #[test]
    fn quota_variant_is_always_quota_class() {
        let err = InferenceError::Quota {
            provider: ProviderKind::OpenAi,
            message: "slow down".to_string(),
        };
        assert!(err.is_quota_class());
    }

    #[test]
    fn auth_error_is_not_quota_class() {
        let err = InferenceError::Auth {
            provider: ProviderKind::OpenAi,
            message: "invalid_api_key".to_string(),
        };
        assert!(!err.is_quota_class());
    }

    #[test]
    fn auth_error_mentioning_billing_is_quota_class() {
        let err = InferenceError::Auth {
            provider: ProviderKind::DeepSeek,
            message: "check your billing details".to_string(),
        };
        assert!(err.is_quota_class());
    }

    #[test]
    fn protocol_error_matching_indicator_is_quota_class() {
        let err = InferenceError::Protocol {
            provider: ProviderKind::Ollama,
            message: "rate_limit in body".to_string(),
        };
        assert!(err.is_quota_class());
    }

    #[test]
    fn transport_error_is_never_quota_class() {
        let err = InferenceError::Transport {
            provider: ProviderKind::OpenAi,
            message: "could not connect: error sending request for url (http://127.0.0.1:4291/v1)"
                .to_string(),
        };
        assert!(!err.is_quota_class());
    }

    #[test]
    fn server_status_alone_does_not_make_quota_class() {
        let err = InferenceError::Server {
            provider: ProviderKind::DeepSeek,
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(!err.is_quota_class());
    }

    #[test]
    fn error_carries_provider_identity() {
        let err = InferenceError::Transport {
            provider: ProviderKind::Ollama,
            message: "refused".to_string(),
        };
        assert_eq!(err.provider(), Some(ProviderKind::Ollama));
        assert_eq!(err.to_string(), "ollama: connection failed: refused");
        assert_eq!(InferenceError::Exhausted(Vec::new()).provider(), None);
    }

    #[test]
    fn exhausted_lists_attempts_in_order() {
        let first = InferenceError::Quota {
            provider: ProviderKind::OpenAi,
            message: "insufficient_quota".to_string(),
        };
        let second = InferenceError::Transport {
            provider: ProviderKind::DeepSeek,
            message: "timeout".to_string(),
        };
        let err = InferenceError::Exhausted(vec![
            FailedAttempt::new(ProviderKind::OpenAi, &first),
            FailedAttempt::new(ProviderKind::DeepSeek, &second),
        ]);
        let text = err.to_string();
        let openai_at = text.find("[openai]").unwrap();
        let deepseek_at = text.find("[deepseek]").unwrap();
        assert!(text.starts_with("All providers failed: "));
        assert!(openai_at < deepseek_at);
        assert!(text.contains("insufficient_quota"));
        assert!(text.contains("timeout"));
    }

    #[test]
    fn server_error_message_includes_status() {
        let err = InferenceError::Server {
            provider: ProviderKind::OpenAi,
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "openai: server error (status 503): overloaded"
        );
        assert!(!err.is_quota_class());
    }
}
