//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer, loads settings and
//! installs logging. [`Components::build`] turns an [`AppConfig`] into a
//! ready conversation service with its voice adapters.

pub mod adapters;
pub mod config;
pub mod factory;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, AppSettings, ConversationConfig, GenerationConfig, HostedProviderConfig,
    InferenceMode, OllamaProviderConfig, SettingsError, VoiceConfig,
};
pub use factory::Components;
pub use telemetry::{LogConfig, LogFormat, TelemetryError, init_logging};
