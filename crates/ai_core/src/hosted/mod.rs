//! Hosted chat-completion providers
//!
//! OpenAI and DeepSeek share the OpenAI wire format (`POST /chat/completions`
//! with a bearer token), so one client serves both.

mod client;

pub use client::HostedInferenceEngine;
