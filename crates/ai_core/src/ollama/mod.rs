//! Local Ollama inference engine
//!
//! Talks to Ollama's native `/api/chat` endpoint. The local models are
//! prompted with system instructions folded into user turns.

mod client;

pub use client::OllamaInferenceEngine;
