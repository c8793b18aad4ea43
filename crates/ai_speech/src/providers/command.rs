//! Spoken output through a local speech command
//!
//! Runs an `espeak-ng`-compatible executable once per utterance and waits
//! for it to exit, so playback is finished when `speak` returns.
//!
//! ```bash
//! sudo apt install espeak-ng
//! espeak-ng -s 150 -a 90 -v pt-br "Olá"
//! ```

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::config::SpeakerConfig;
use crate::error::SpeechError;
use crate::ports::Speaker;

/// Speaker backed by an external speech synthesizer
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    config: SpeakerConfig,
}

impl CommandSpeaker {
    /// Create a new command speaker
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeakerConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    /// Arguments passed before the text
    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-s".to_string(),
            self.config.rate.to_string(),
            "-a".to_string(),
            self.config.amplitude().to_string(),
        ];
        if let Some(voice) = &self.config.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    #[instrument(skip(self, text), fields(command = %self.config.command, text_len = text.len()))]
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let mut cmd = Command::new(&self.config.command);
        cmd.args(self.args())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!("Running speech command");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "speech command '{}' not found",
                    self.config.command
                ))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run speech command: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Speech command failed: {}", stderr.trim());
            return Err(SpeechError::SynthesisFailed(format!(
                "speech command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
