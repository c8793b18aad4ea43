//! AI Core - Chat-completion providers and automatic failover
//!
//! Provides one uniform inference interface over three backends:
//! OpenAI and DeepSeek (hosted, OpenAI-compatible wire format) and a local
//! Ollama server. [`FallbackEngine`] chains them and switches provider when
//! the active one runs out of quota.

pub mod config;
pub mod error;
pub mod fallback;
pub mod hosted;
pub mod ollama;
pub mod ports;
pub mod provider;

mod classify;

pub use config::{HostedConfig, OllamaConfig};
pub use error::{FailedAttempt, InferenceError, QUOTA_INDICATORS, is_quota_message};
pub use fallback::{FallbackEngine, FallbackState, MAX_FALLBACKS};
pub use hosted::HostedInferenceEngine;
pub use ollama::OllamaInferenceEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
pub use provider::ProviderKind;
