//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod inference_adapter;
mod voice_adapter;

pub use inference_adapter::InferenceAdapter;
pub use voice_adapter::{NOT_UNDERSTOOD, VoiceInputAdapter, VoiceOutputAdapter};
