//! Voice capture and playback settings

use ai_speech::{RecorderConfig, SpeakerConfig, SpeechConfig};
use secrecy::SecretString;
use serde::Deserialize;

/// Voice settings for the interactive session
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Whether replies are spoken and the `voice` command is offered
    #[serde(default = "crate::config::default_true")]
    pub enabled: bool,

    /// Spoken language as a BCP 47 tag
    #[serde(default = "default_language")]
    pub language: String,

    /// Speech rate in words per minute
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// Playback volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Synthesizer voice name, if not the command's default
    #[serde(default)]
    pub voice: Option<String>,

    /// Recorder executable
    #[serde(default = "default_recorder_command")]
    pub recorder_command: String,

    /// Speech synthesizer executable
    #[serde(default = "default_speaker_command")]
    pub speaker_command: String,

    /// Length of each capture in seconds
    #[serde(default = "default_record_seconds")]
    pub record_seconds: u32,

    /// Transcription model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,
}

fn default_language() -> String {
    "pt-BR".to_string()
}

const fn default_rate() -> u32 {
    150
}

const fn default_volume() -> f32 {
    0.9
}

fn default_recorder_command() -> String {
    "arecord".to_string()
}

fn default_speaker_command() -> String {
    "espeak-ng".to_string()
}

const fn default_record_seconds() -> u32 {
    5
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_language(),
            rate: default_rate(),
            volume: default_volume(),
            voice: None,
            recorder_command: default_recorder_command(),
            speaker_command: default_speaker_command(),
            record_seconds: default_record_seconds(),
            stt_model: default_stt_model(),
        }
    }
}

impl VoiceConfig {
    /// Whisper settings; transcription shares the OpenAI credential
    #[must_use]
    pub fn speech_config(&self, api_key: Option<SecretString>, base_url: &str) -> SpeechConfig {
        SpeechConfig {
            openai_api_key: api_key,
            openai_base_url: base_url.to_string(),
            stt_model: self.stt_model.clone(),
            language: self.language.clone(),
            ..SpeechConfig::default()
        }
    }

    #[must_use]
    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            command: self.recorder_command.clone(),
            record_seconds: self.record_seconds,
            ..RecorderConfig::default()
        }
    }

    #[must_use]
    pub fn speaker_config(&self) -> SpeakerConfig {
        SpeakerConfig {
            command: self.speaker_command.clone(),
            rate: self.rate,
            volume: self.volume,
            voice: self.voice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config = VoiceConfig::default();
        assert!(config.enabled);
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.rate, 150);
        assert!((config.volume - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.record_seconds, 5);
    }

    #[test]
    fn speaker_config_carries_rate_and_volume() {
        let config = VoiceConfig {
            rate: 180,
            volume: 0.5,
            voice: Some("pt-br".to_string()),
            ..VoiceConfig::default()
        };
        let speaker = config.speaker_config();
        assert_eq!(speaker.command, "espeak-ng");
        assert_eq!(speaker.rate, 180);
        assert!((speaker.volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(speaker.voice.as_deref(), Some("pt-br"));
    }

    #[test]
    fn speech_config_uses_language_hint() {
        let config = VoiceConfig {
            language: "en-US".to_string(),
            ..VoiceConfig::default()
        };
        let speech = config.speech_config(Some(SecretString::from("sk-test")), "http://localhost");
        assert_eq!(speech.whisper_language().as_deref(), Some("en"));
        assert_eq!(speech.openai_base_url, "http://localhost");
        assert!(speech.validate().is_ok());
    }

    #[test]
    fn recorder_config_uses_command_and_duration() {
        let config = VoiceConfig {
            recorder_command: "rec".to_string(),
            record_seconds: 3,
            ..VoiceConfig::default()
        };
        let recorder = config.recorder_config();
        assert_eq!(recorder.command, "rec");
        assert_eq!(recorder.record_seconds, 3);
        assert_eq!(recorder.sample_rate, 16_000);
    }
}
