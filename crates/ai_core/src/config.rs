//! Configuration for the inference engines

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Configuration for a hosted, OpenAI-compatible chat-completion provider
#[derive(Debug, Clone, Deserialize)]
pub struct HostedConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model used when a request does not name one
    pub default_model: String,

    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_hosted_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

const fn default_hosted_timeout_ms() -> u64 {
    30_000
}

const fn default_max_tokens() -> u32 {
    150
}

const fn default_temperature() -> f32 {
    0.7
}

impl HostedConfig {
    /// Defaults for api.openai.com
    #[must_use]
    pub fn openai() -> Self {
        Self::with_endpoint("https://api.openai.com/v1", "gpt-3.5-turbo")
    }

    /// Defaults for api.deepseek.com
    #[must_use]
    pub fn deepseek() -> Self {
        Self::with_endpoint("https://api.deepseek.com/v1", "deepseek-chat")
    }

    fn with_endpoint(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            default_model: model.to_string(),
            api_key: None,
            timeout_ms: default_hosted_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Set the bearer credential
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a non-blank credential is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

/// Configuration for a local Ollama server
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Default model to use
    #[serde(default = "default_ollama_model")]
    pub default_model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_ollama_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate (`num_predict`)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for the `/api/tags` reachability probe
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Probe the server before every generation and fail fast when it is down
    #[serde(default)]
    pub require_available: bool,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

const fn default_ollama_timeout_ms() -> u64 {
    60_000
}

const fn default_probe_timeout_ms() -> u64 {
    5_000
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            default_model: default_ollama_model(),
            timeout_ms: default_ollama_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            probe_timeout_ms: default_probe_timeout_ms(),
            require_available: false,
        }
    }
}

impl OllamaConfig {
    /// Use a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
