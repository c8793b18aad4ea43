//! Types for speech processing
//!
//! Audio clips captured from the microphone and the transcriptions produced
//! from them.

use serde::{Deserialize, Serialize};

/// Audio formats accepted by the transcription service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WAV (uncompressed PCM, what the recorder produces)
    Wav,
    /// MP3 format
    Mp3,
    /// FLAC format (lossless)
    Flac,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension for this audio format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }
}

/// Container for audio data with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
    duration_ms: Option<u64>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            duration_ms: None,
        }
    }

    /// Attach a known duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Upload file name with the right extension
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        format!("{base}.{}", self.format.extension())
    }
}

/// Result of a transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Recognized text
    pub text: String,
    /// Detected or requested language
    #[serde(default)]
    pub language: Option<String>,
    /// Audio duration reported by the service
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Transcription {
    /// Create a simple transcription with just text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            duration_ms: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// True when nothing intelligible was recognized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_metadata() {
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::Wav.extension(), "wav");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }

    #[test]
    fn filename_includes_extension() {
        let audio = AudioData::new(vec![1, 2, 3], AudioFormat::Wav);
        assert_eq!(audio.filename("utterance"), "utterance.wav");
        assert_eq!(audio.size_bytes(), 3);
        assert!(!audio.is_empty());
    }

    #[test]
    fn duration_is_optional() {
        let audio = AudioData::new(Vec::new(), AudioFormat::Flac);
        assert_eq!(audio.duration_ms(), None);
        assert_eq!(audio.with_duration(5000).duration_ms(), Some(5000));
    }

    #[test]
    fn whitespace_transcription_is_empty() {
        assert!(Transcription::new("  \n").is_empty());
        assert!(!Transcription::new("hello").is_empty());
    }

    #[test]
    fn transcription_builders() {
        let t = Transcription::new("oi").with_language("pt").with_duration(1200);
        assert_eq!(t.language.as_deref(), Some("pt"));
        assert_eq!(t.duration_ms, Some(1200));
    }
}
