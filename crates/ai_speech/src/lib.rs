//! AI Speech - Microphone capture, speech-to-text and spoken output
//!
//! Provides traits and implementations for the voice side of a session:
//! - `AudioRecorder` - Capture one utterance from the microphone
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `Speaker` - Speak a reply aloud
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - `arecord` for capture
//! - OpenAI Whisper for transcription
//! - `espeak-ng` (or any compatible command) for speech output
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioRecorder, MicrophoneRecorder, OpenAiTranscriber, SpeechToText};
//!
//! let recorder = MicrophoneRecorder::new(RecorderConfig::default())?;
//! let transcriber = OpenAiTranscriber::new(config)?;
//!
//! let audio = recorder.record().await?;
//! let transcription = transcriber.transcribe(audio, Some("pt")).await?;
//! println!("Heard: {}", transcription.text);
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{RecorderConfig, SpeakerConfig, SpeechConfig};
pub use error::SpeechError;
pub use ports::{AudioRecorder, Speaker, SpeechToText};
pub use providers::command::CommandSpeaker;
pub use providers::console::ConsoleSpeaker;
pub use providers::openai::OpenAiTranscriber;
pub use providers::recorder::MicrophoneRecorder;
pub use types::{AudioData, AudioFormat, Transcription};
