//! Configuration for speech processing

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Configuration for the Whisper transcription service
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<SecretString>,

    /// OpenAI API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Spoken language as a BCP 47 tag (e.g. "pt-BR")
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            stt_model: default_stt_model(),
            language: default_language(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if the API key is missing or the base URL is empty.
    pub fn validate(&self) -> Result<(), String> {
        let has_key = self
            .openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty());
        if !has_key {
            return Err("OpenAI API key is required for transcription".to_string());
        }
        if self.openai_base_url.trim().is_empty() {
            return Err("OpenAI base URL must not be empty".to_string());
        }
        Ok(())
    }

    /// ISO 639-1 code Whisper expects, e.g. `pt` for `pt-BR`
    #[must_use]
    pub fn whisper_language(&self) -> Option<String> {
        self.language
            .split(['-', '_'])
            .next()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_lowercase)
    }
}

/// Configuration for microphone capture through an external recorder
#[derive(Debug, Clone, Deserialize)]
pub struct RecorderConfig {
    /// Recorder executable (`arecord`-compatible flags)
    #[serde(default = "default_recorder_command")]
    pub command: String,

    /// Length of each capture in seconds
    #[serde(default = "default_record_seconds")]
    pub record_seconds: u32,

    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_recorder_command() -> String {
    "arecord".to_string()
}

const fn default_record_seconds() -> u32 {
    5
}

const fn default_sample_rate() -> u32 {
    16_000
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            command: default_recorder_command(),
            record_seconds: default_record_seconds(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Configuration for spoken output through an external speech command
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerConfig {
    /// Speech executable (`espeak-ng`-compatible flags)
    #[serde(default = "default_speaker_command")]
    pub command: String,

    /// Speaking rate in words per minute
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// Volume from 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Voice name passed to the command, if any
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_speaker_command() -> String {
    "espeak-ng".to_string()
}

const fn default_rate() -> u32 {
    150
}

const fn default_volume() -> f32 {
    0.9
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            command: default_speaker_command(),
            rate: default_rate(),
            volume: default_volume(),
            voice: None,
        }
    }
}

impl SpeakerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if the volume is outside `0.0..=1.0` or the
    /// command is empty.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(format!("volume must be between 0.0 and 1.0, got {}", self.volume));
        }
        if self.command.trim().is_empty() {
            return Err("speech command must not be empty".to_string());
        }
        Ok(())
    }

    /// Volume on the 0-200 amplitude scale used by espeak-ng
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn amplitude(&self) -> u32 {
        (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_speech_config() {
        let config = SpeechConfig::default();
        assert_eq!(config.stt_model, "whisper-1");
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.timeout_ms, 30000);
    }

    #[test]
    fn validate_requires_api_key() {
        assert!(SpeechConfig::default().validate().is_err());

        let config = SpeechConfig {
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn whisper_language_uses_primary_subtag() {
        let mut config = SpeechConfig::default();
        assert_eq!(config.whisper_language().as_deref(), Some("pt"));

        config.language = "en_US".to_string();
        assert_eq!(config.whisper_language().as_deref(), Some("en"));

        config.language = String::new();
        assert_eq!(config.whisper_language(), None);
    }

    #[test]
    fn recorder_defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.command, "arecord");
        assert_eq!(config.record_seconds, 5);
        assert_eq!(config.sample_rate, 16_000);
    }

    #[test]
    fn speaker_defaults_and_amplitude() {
        let config = SpeakerConfig::default();
        assert_eq!(config.rate, 150);
        assert_eq!(config.amplitude(), 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn speaker_rejects_out_of_range_volume() {
        let config = SpeakerConfig {
            volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn speaker_deserializes_from_toml() {
        let config: SpeakerConfig = toml::from_str(
            r#"
            command = "say"
            rate = 180
            "#,
        )
        .unwrap();
        assert_eq!(config.command, "say");
        assert_eq!(config.rate, 180);
        assert!((config.volume - 0.9).abs() < f32::EPSILON);
    }
}
