//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::{SpeechToText, AudioData, AudioFormat};
///
/// async fn transcribe_clip(stt: &impl SpeechToText, audio: AudioData) -> Result<String, SpeechError> {
///     let transcription = stt.transcribe(audio, Some("pt")).await?;
///     Ok(transcription.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// `language` is an optional ISO 639-1 hint (e.g. "en", "pt").
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails.
    async fn transcribe(
        &self,
        audio: AudioData,
        language: Option<&str>,
    ) -> Result<Transcription, SpeechError>;

    /// Check if the STT service is available
    async fn is_available(&self) -> bool;

    /// Name of the STT model
    fn model_name(&self) -> &str;
}

/// Port for capturing one utterance from an input device
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Record a single clip
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::RecordingFailed` or `SpeechError::NotAvailable`.
    async fn record(&self) -> Result<AudioData, SpeechError>;
}

/// Port for speaking text aloud
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, returning once playback has finished
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::SynthesisFailed` or `SpeechError::NotAvailable`.
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFormat;

    struct EchoTranscriber;

    #[async_trait]
    impl SpeechToText for EchoTranscriber {
        async fn transcribe(
            &self,
            audio: AudioData,
            language: Option<&str>,
        ) -> Result<Transcription, SpeechError> {
            let text = String::from_utf8_lossy(audio.data()).to_string();
            let mut transcription = Transcription::new(text);
            if let Some(lang) = language {
                transcription = transcription.with_language(lang);
            }
            Ok(transcription)
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn transcriber_is_object_safe() {
        let stt: Box<dyn SpeechToText> = Box::new(EchoTranscriber);
        let audio = AudioData::new(b"hello".to_vec(), AudioFormat::Wav);

        let result = stt.transcribe(audio, Some("en")).await.unwrap();

        assert_eq!(result.text, "hello");
        assert_eq!(result.language.as_deref(), Some("en"));
        assert!(stt.is_available().await);
        assert_eq!(stt.model_name(), "echo");
    }
}
