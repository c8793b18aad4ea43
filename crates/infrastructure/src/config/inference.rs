//! Provider and generation settings

use std::fmt;

use ai_core::{HostedConfig, OllamaConfig};
use domain::GenerationParams;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Which inference backend the session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// OpenAI first, then DeepSeek, then the local server
    #[default]
    Fallback,
    /// Local Ollama server only
    Local,
}

impl fmt::Display for InferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallback => write!(f, "fallback"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "local" | "ollama" => Ok(Self::Local),
            _ => Err(format!(
                "Invalid inference mode: {s}. Use 'fallback' or 'local'"
            )),
        }
    }
}

/// Settings for one hosted provider
#[derive(Debug, Clone, Deserialize)]
pub struct HostedProviderConfig {
    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// API base URL
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_hosted_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_hosted_timeout_ms() -> u64 {
    30_000
}

impl HostedProviderConfig {
    pub(crate) fn openai() -> Self {
        let defaults = HostedConfig::openai();
        Self::from_defaults(&defaults)
    }

    pub(crate) fn deepseek() -> Self {
        let defaults = HostedConfig::deepseek();
        Self::from_defaults(&defaults)
    }

    fn from_defaults(defaults: &HostedConfig) -> Self {
        Self {
            api_key: None,
            base_url: defaults.base_url.clone(),
            model: defaults.default_model.clone(),
            timeout_ms: defaults.timeout_ms,
        }
    }

    /// Whether a non-blank credential is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Client configuration for this provider
    #[must_use]
    pub fn to_client_config(&self, generation: &GenerationConfig) -> HostedConfig {
        HostedConfig {
            base_url: self.base_url.clone(),
            default_model: self.model.clone(),
            api_key: self.api_key.clone(),
            timeout_ms: self.timeout_ms,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        }
    }
}

/// Settings for the local Ollama server
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaProviderConfig {
    /// Base URL of the server
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_ollama_timeout_ms")]
    pub timeout_ms: u64,

    /// Fail fast when `/api/tags` does not answer before each generation
    ///
    /// Always on in local mode.
    #[serde(default)]
    pub require_available: bool,
}

const fn default_ollama_timeout_ms() -> u64 {
    60_000
}

impl Default for OllamaProviderConfig {
    fn default() -> Self {
        let defaults = OllamaConfig::default();
        Self {
            base_url: defaults.base_url,
            model: defaults.default_model,
            timeout_ms: defaults.timeout_ms,
            require_available: defaults.require_available,
        }
    }
}

impl OllamaProviderConfig {
    /// Client configuration for the local server
    #[must_use]
    pub fn to_client_config(&self, generation: &GenerationConfig) -> OllamaConfig {
        OllamaConfig {
            base_url: self.base_url.clone(),
            default_model: self.model.clone(),
            timeout_ms: self.timeout_ms,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
            require_available: self.require_available,
            ..OllamaConfig::default()
        }
    }
}

/// Sampling settings shared by every provider
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

const fn default_max_tokens() -> u32 {
    150
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl GenerationConfig {
    /// Validated parameters for the conversation service
    ///
    /// # Errors
    ///
    /// Returns the validation message when either value is out of range.
    pub fn to_params(self) -> Result<GenerationParams, String> {
        GenerationParams::new(self.max_tokens, self.temperature).map_err(|e| e.to_string())
    }
}
