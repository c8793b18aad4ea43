//! Microphone capture through an external recorder
//!
//! Uses `arecord` (ALSA) flags: a fixed-length, mono, 16-bit WAV clip is
//! written to a temporary file and read back.

use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::RecorderConfig;
use crate::error::SpeechError;
use crate::ports::AudioRecorder;
use crate::types::{AudioData, AudioFormat};

/// Records one utterance per call from the default capture device
#[derive(Debug, Clone)]
pub struct MicrophoneRecorder {
    config: RecorderConfig,
}

impl MicrophoneRecorder {
    /// Create a new recorder
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the command is empty or the
    /// clip length is zero.
    pub fn new(config: RecorderConfig) -> Result<Self, SpeechError> {
        if config.command.trim().is_empty() {
            return Err(SpeechError::Configuration(
                "recorder command must not be empty".to_string(),
            ));
        }
        if config.record_seconds == 0 {
            return Err(SpeechError::Configuration(
                "record_seconds must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    fn args(&self) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-f".to_string(),
            "S16_LE".to_string(),
            "-c".to_string(),
            "1".to_string(),
            "-r".to_string(),
            self.config.sample_rate.to_string(),
            "-d".to_string(),
            self.config.record_seconds.to_string(),
            "-t".to_string(),
            "wav".to_string(),
        ]
    }
}

#[async_trait]
impl AudioRecorder for MicrophoneRecorder {
    #[instrument(skip(self), fields(command = %self.config.command, seconds = self.config.record_seconds))]
    async fn record(&self) -> Result<AudioData, SpeechError> {
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::RecordingFailed(format!("Failed to create temp file: {e}"))
        })?;

        let mut cmd = Command::new(&self.config.command);
        cmd.args(self.args())
            .arg(output_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!("Recording from microphone");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "recorder '{}' not found",
                    self.config.command
                ))
            } else {
                SpeechError::RecordingFailed(format!("Failed to run recorder: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Recorder failed: {}", stderr.trim());
            return Err(SpeechError::RecordingFailed(format!(
                "recorder exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let data = tokio::fs::read(output_file.path()).await.map_err(|e| {
            SpeechError::RecordingFailed(format!("Failed to read recording: {e}"))
        })?;

        if data.is_empty() {
            warn!("Recorder produced no audio");
            return Err(SpeechError::RecordingFailed(
                "no audio was captured".to_string(),
            ));
        }

        Ok(AudioData::new(data, AudioFormat::Wav)
            .with_duration(u64::from(self.config.record_seconds) * 1000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(command: &str) -> MicrophoneRecorder {
        MicrophoneRecorder::new(RecorderConfig {
            command: command.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn args_describe_mono_wav_clip() {
        let args = MicrophoneRecorder::new(RecorderConfig::default()).unwrap().args();
        assert_eq!(
            args,
            ["-q", "-f", "S16_LE", "-c", "1", "-r", "16000", "-d", "5", "-t", "wav"]
        );
    }

    #[test]
    fn zero_length_clip_is_rejected() {
        let result = MicrophoneRecorder::new(RecorderConfig {
            record_seconds: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[tokio::test]
    async fn missing_recorder_is_not_available() {
        let result = recorder("definitely-not-installed-recorder").record().await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn recorder_writing_nothing_is_failure() {
        let result = recorder("true").record().await;
        assert!(matches!(result, Err(SpeechError::RecordingFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_recorder_is_failure() {
        let result = recorder("false").record().await;
        assert!(matches!(result, Err(SpeechError::RecordingFailed(_))));
    }
}
