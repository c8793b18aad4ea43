//! Application configuration
//!
//! Split into focused sub-modules:
//! - `inference`: provider endpoints, credentials and sampling
//! - `voice`: microphone, transcription and speech output
//!
//! Sources, lowest precedence first: built-in defaults, `voicedesk.toml`,
//! `VOICEDESK__SECTION__KEY` environment variables, and the flat variables
//! older deployments set (`OPENAI_API_KEY`, `VOICE_RATE`, ...).

mod inference;
mod voice;

use std::collections::BTreeMap;

use application::DEFAULT_MAX_HISTORY_TURNS;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use inference::{
    GenerationConfig, HostedProviderConfig, InferenceMode, OllamaProviderConfig,
};
pub use voice::VoiceConfig;

use crate::telemetry::LogFormat;

/// Base name of the optional configuration file
pub const CONFIG_FILE: &str = "voicedesk";

/// Prefix of the structured environment variables
pub const ENV_PREFIX: &str = "VOICEDESK";

/// Flat environment variables and the keys they override
const PLAIN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "openai.api_key"),
    ("OPENAI_MODEL", "openai.model"),
    ("OPENAI_MAX_TOKENS", "generation.max_tokens"),
    ("OPENAI_TEMPERATURE", "generation.temperature"),
    ("DEEPSEEK_API_KEY", "deepseek.api_key"),
    ("OLLAMA_MODEL", "ollama.model"),
    ("OLLAMA_BASE_URL", "ollama.base_url"),
    ("VOICE_RATE", "speech.rate"),
    ("VOICE_VOLUME", "speech.volume"),
    ("VOICE_LANGUAGE", "speech.language"),
    ("DEBUG", "app.debug"),
];

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Errors raised while loading or checking settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings were read but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Conversation settings
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Replaces the built-in system instruction when set
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// User+assistant pairs of history sent with each request
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

const fn default_max_history_turns() -> usize {
    DEFAULT_MAX_HISTORY_TURNS
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_history_turns: default_max_history_turns(),
        }
    }
}

/// Presentation and logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Name shown in the session banner
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Verbose logging and error details
    #[serde(default)]
    pub debug: bool,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_app_name() -> String {
    "VoiceDesk".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            debug: false,
            log_format: LogFormat::default(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Which backend answers
    #[serde(default)]
    pub mode: InferenceMode,

    /// Primary hosted provider
    pub openai: HostedProviderConfig,

    /// Secondary hosted provider
    pub deepseek: HostedProviderConfig,

    /// Local server, last in the fallback chain or the only backend in local mode
    #[serde(default)]
    pub ollama: OllamaProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub speech: VoiceConfig,

    #[serde(default)]
    pub app: AppSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: InferenceMode::default(),
            openai: HostedProviderConfig::openai(),
            deepseek: HostedProviderConfig::deepseek(),
            ollama: OllamaProviderConfig::default(),
            generation: GenerationConfig::default(),
            conversation: ConversationConfig::default(),
            speech: VoiceConfig::default(),
            app: AppSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and optional file
    pub fn load() -> Result<Self, SettingsError> {
        let env: config::Map<String, String> = std::env::vars().collect();
        Self::from_sources(
            config::File::with_name(CONFIG_FILE).required(false),
            &env,
        )
    }

    /// Load configuration from TOML text and an explicit environment
    pub fn from_toml(toml: &str, env: &config::Map<String, String>) -> Result<Self, SettingsError> {
        Self::from_sources(
            config::File::from_str(toml, config::FileFormat::Toml),
            env,
        )
    }

    fn from_sources<S>(file: S, env: &config::Map<String, String>) -> Result<Self, SettingsError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            // Start with defaults
            .set_default("mode", defaults.mode.to_string())?
            .set_default("openai.base_url", defaults.openai.base_url)?
            .set_default("openai.model", defaults.openai.model)?
            .set_default("deepseek.base_url", defaults.deepseek.base_url)?
            .set_default("deepseek.model", defaults.deepseek.model)?
            .set_default("ollama.base_url", defaults.ollama.base_url)?
            .set_default("ollama.model", defaults.ollama.model)?
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., VOICEDESK__OPENAI__MODEL)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            );

        // Flat variables win over everything else
        for (var, key) in PLAIN_ENV_OVERRIDES {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }
        if env
            .get("OLLAMA_ENABLED")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        {
            builder = builder.set_override("mode", InferenceMode::Local.to_string())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(mode = %config.mode, "Configuration loaded");
        Ok(config)
    }

    /// Check that the loaded settings can start a session
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` when a credential required by the
    /// selected mode is missing or a numeric setting is out of range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.mode == InferenceMode::Fallback {
            if !self.openai.has_api_key() {
                return Err(SettingsError::Invalid(
                    "OPENAI_API_KEY is required in fallback mode".to_string(),
                ));
            }
            if !self.deepseek.has_api_key() {
                return Err(SettingsError::Invalid(
                    "DEEPSEEK_API_KEY is required in fallback mode".to_string(),
                ));
            }
        }

        self.generation
            .to_params()
            .map_err(SettingsError::Invalid)?;

        if self.speech.enabled {
            self.speech
                .speaker_config()
                .validate()
                .map_err(SettingsError::Invalid)?;
        }

        Ok(())
    }

    /// Settings as display strings, with credentials masked
    #[must_use]
    pub fn to_redacted_map(&self) -> BTreeMap<String, String> {
        fn secret(configured: bool) -> String {
            if configured { "***" } else { "not set" }.to_string()
        }

        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            map.insert(key.to_string(), value);
        };

        put("mode", self.mode.to_string());
        for (name, provider) in [("openai", &self.openai), ("deepseek", &self.deepseek)] {
            put(&format!("{name}.api_key"), secret(provider.has_api_key()));
            put(&format!("{name}.base_url"), provider.base_url.clone());
            put(&format!("{name}.model"), provider.model.clone());
        }
        put("ollama.base_url", self.ollama.base_url.clone());
        put("ollama.model", self.ollama.model.clone());
        put("generation.max_tokens", self.generation.max_tokens.to_string());
        put("generation.temperature", self.generation.temperature.to_string());
        put(
            "conversation.max_history_turns",
            self.conversation.max_history_turns.to_string(),
        );
        put(
            "conversation.system_prompt",
            self.conversation
                .system_prompt
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        );
        put("speech.enabled", self.speech.enabled.to_string());
        put("speech.language", self.speech.language.clone());
        put("speech.rate", self.speech.rate.to_string());
        put("speech.volume", self.speech.volume.to_string());
        put("speech.recorder_command", self.speech.recorder_command.clone());
        put("speech.speaker_command", self.speech.speaker_command.clone());
        put("speech.record_seconds", self.speech.record_seconds.to_string());
        put("app.name", self.app.name.clone());
        put("app.debug", self.app.debug.to_string());
        put("app.log_format", self.app.log_format.to_string());

        map
    }
}
