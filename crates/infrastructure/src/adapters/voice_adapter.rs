//! Voice adapters - Implement the voice ports using ai_speech
//!
//! Input records one fixed-length clip and sends it to the transcriber.
//! Output hands the reply to a [`Speaker`].

use std::sync::Arc;

use ai_speech::{AudioRecorder, Speaker, SpeechError, SpeechToText};
use application::{
    error::ApplicationError,
    ports::{ListenOutcome, VoiceInputPort, VoiceOutputPort},
};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Diagnostic reported when the clip produced no words
pub const NOT_UNDERSTOOD: &str = "Could not understand the audio";

/// Capture and transcription behind [`VoiceInputPort`]
pub struct VoiceInputAdapter {
    recorder: Arc<dyn AudioRecorder>,
    transcriber: Arc<dyn SpeechToText>,
    language: Option<String>,
}

impl std::fmt::Debug for VoiceInputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceInputAdapter")
            .field("model", &self.transcriber.model_name())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl VoiceInputAdapter {
    /// Create an adapter; `language` is the ISO 639-1 hint sent with each clip
    pub fn new(
        recorder: Arc<dyn AudioRecorder>,
        transcriber: Arc<dyn SpeechToText>,
        language: Option<String>,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            language,
        }
    }

    async fn capture(&self) -> Result<String, SpeechError> {
        let audio = self.recorder.record().await?;
        debug!(bytes = audio.size_bytes(), "Clip recorded");
        let transcription = self
            .transcriber
            .transcribe(audio, self.language.as_deref())
            .await?;
        Ok(transcription.text)
    }
}

#[async_trait]
impl VoiceInputPort for VoiceInputAdapter {
    #[instrument(skip(self))]
    async fn listen(&self) -> ListenOutcome {
        match self.capture().await {
            Ok(text) if text.trim().is_empty() => {
                info!("Transcription was empty");
                ListenOutcome::Failed(NOT_UNDERSTOOD.to_string())
            },
            Ok(text) => ListenOutcome::Recognized(text.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "Voice capture failed");
                ListenOutcome::Failed(e.to_string())
            },
        }
    }
}

/// Spoken replies behind [`VoiceOutputPort`]
pub struct VoiceOutputAdapter {
    speaker: Arc<dyn Speaker>,
}

impl std::fmt::Debug for VoiceOutputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceOutputAdapter").finish_non_exhaustive()
    }
}

impl VoiceOutputAdapter {
    pub fn new(speaker: Arc<dyn Speaker>) -> Self {
        Self { speaker }
    }
}

#[async_trait]
impl VoiceOutputPort for VoiceOutputAdapter {
    async fn speak(&self, text: &str) -> Result<(), ApplicationError> {
        self.speaker
            .speak(text)
            .await
            .map_err(|e| ApplicationError::Speech(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use ai_speech::{AudioData, AudioFormat, ConsoleSpeaker, Transcription};
    use parking_lot::Mutex;

    use super::*;

    struct FixedRecorder {
        fail: bool,
    }

    #[async_trait]
    impl AudioRecorder for FixedRecorder {
        async fn record(&self) -> Result<AudioData, SpeechError> {
            if self.fail {
                Err(SpeechError::RecordingFailed("no input device".to_string()))
            } else {
                Ok(AudioData::new(vec![0u8; 64], AudioFormat::Wav))
            }
        }
    }

    struct FixedTranscriber {
        text: &'static str,
        seen_language: Mutex<Option<String>>,
    }

    impl FixedTranscriber {
        fn new(text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                text,
                seen_language: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SpeechToText for FixedTranscriber {
        async fn transcribe(
            &self,
            _audio: AudioData,
            language: Option<&str>,
        ) -> Result<Transcription, SpeechError> {
            *self.seen_language.lock() = language.map(str::to_string);
            Ok(Transcription::new(self.text))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "whisper-1"
        }
    }

    struct FailingSpeaker;

    #[async_trait]
    impl Speaker for FailingSpeaker {
        async fn speak(&self, _text: &str) -> Result<(), SpeechError> {
            Err(SpeechError::SynthesisFailed("device busy".to_string()))
        }
    }

    #[tokio::test]
    async fn recognized_speech_is_trimmed() {
        let transcriber = FixedTranscriber::new("  I need help with my bill ");
        let adapter = VoiceInputAdapter::new(
            Arc::new(FixedRecorder { fail: false }),
            transcriber.clone(),
            Some("pt".to_string()),
        );

        assert_eq!(
            adapter.listen().await,
            ListenOutcome::Recognized("I need help with my bill".to_string())
        );
        assert_eq!(transcriber.seen_language.lock().as_deref(), Some("pt"));
    }

    #[tokio::test]
    async fn empty_transcription_is_not_understood() {
        let adapter = VoiceInputAdapter::new(
            Arc::new(FixedRecorder { fail: false }),
            FixedTranscriber::new("   "),
            None,
        );
        assert_eq!(
            adapter.listen().await,
            ListenOutcome::Failed(NOT_UNDERSTOOD.to_string())
        );
    }

    #[tokio::test]
    async fn recorder_failure_is_reported_not_raised() {
        let adapter = VoiceInputAdapter::new(
            Arc::new(FixedRecorder { fail: true }),
            FixedTranscriber::new("unused"),
            None,
        );
        let outcome = adapter.listen().await;
        assert!(matches!(outcome, ListenOutcome::Failed(ref m) if m.contains("no input device")));
    }

    #[tokio::test]
    async fn speaker_errors_become_speech_errors() {
        let adapter = VoiceOutputAdapter::new(Arc::new(FailingSpeaker));
        let err = adapter.speak("hello").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Speech(ref m) if m.contains("device busy")));
    }

    #[tokio::test]
    async fn console_speaker_succeeds() {
        let adapter = VoiceOutputAdapter::new(Arc::new(ConsoleSpeaker));
        tokio_test::assert_ok!(adapter.speak("hello").await);
    }
}
