//! OpenAI Whisper transcription provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, Transcription};

/// Speech-to-text through the OpenAI `/audio/transcriptions` endpoint
pub struct OpenAiTranscriber {
    client: Client,
    config: SpeechConfig,
    api_key: SecretString,
}

impl std::fmt::Debug for OpenAiTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranscriber")
            .field("base_url", &self.config.openai_base_url)
            .field("model", &self.config.stt_model)
            .finish_non_exhaustive()
    }
}

impl OpenAiTranscriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| SpeechError::Configuration("OpenAI API key is required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Language hint derived from the configured locale
    #[must_use]
    pub fn default_language(&self) -> Option<String> {
        self.config.whisper_language()
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{endpoint}",
            self.config.openai_base_url.trim_end_matches('/')
        )
    }
}

/// OpenAI Whisper transcription response
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl SpeechToText for OpenAiTranscriber {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = ?audio.format()))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        debug!("Transcribing audio with OpenAI Whisper");

        let filename = audio.filename("utterance");
        let mime_type = audio.format().mime_type();
        let file_part = Part::bytes(audio.into_data())
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.stt_model.clone())
            .text("response_format", "json");
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(self.url("audio/transcriptions"))
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Transcription request failed");

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SpeechError::RateLimited);
            }
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    _ => Err(SpeechError::TranscriptionFailed(api_error.error.message)),
                };
            }
            return Err(SpeechError::TranscriptionFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let whisper: WhisperResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(text_len = whisper.text.len(), "Transcription complete");

        let mut transcription = Transcription::new(whisper.text.trim());
        if let Some(lang) = whisper.language.or_else(|| language.map(str::to_string)) {
            transcription = transcription.with_language(lang);
        }
        if let Some(duration) = whisper.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    async fn is_available(&self) -> bool {
        let result = self
            .client
            .get(self.url("models"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(Duration::from_secs(5))
            .send()
            .await;
        matches!(result, Ok(response) if response.status().is_success())
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}
