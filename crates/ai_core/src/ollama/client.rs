//! Ollama client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::classify::error_from_status;
use crate::config::OllamaConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
use crate::provider::ProviderKind;

/// Prefix put in front of system instructions rewritten as user turns
pub const SYSTEM_INSTRUCTION_PREFIX: &str = "System instruction: ";

const PROVIDER: ProviderKind = ProviderKind::Ollama;

/// Inference engine backed by a local Ollama server
#[derive(Debug)]
pub struct OllamaInferenceEngine {
    client: Client,
    config: OllamaConfig,
}

impl OllamaInferenceEngine {
    /// Create a new Ollama inference engine
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized Ollama inference engine"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration (localhost, llama2)
    pub fn with_defaults() -> Result<Self, InferenceError> {
        Self::new(OllamaConfig::default())
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn resolve_model<'a>(&'a self, request: &'a InferenceRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }

    /// Rewrite system messages as user messages
    ///
    /// Local models follow instructions more reliably when they arrive as a
    /// user turn, so the content is kept and the role changed.
    #[must_use]
    pub fn translate_messages(messages: &[InferenceMessage]) -> Vec<InferenceMessage> {
        messages
            .iter()
            .map(|m| {
                if m.role == "system" {
                    InferenceMessage::new("user", format!("{SYSTEM_INSTRUCTION_PREFIX}{}", m.content))
                } else {
                    m.clone()
                }
            })
            .collect()
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, InferenceError> {
        let timeout_ms = self.config.probe_timeout_ms;
        let response = self
            .client
            .get(self.api_url("tags"))
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| InferenceError::transport(PROVIDER, e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(PROVIDER, status, &body));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Protocol {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the server answers `GET /api/tags` with a success status
    pub async fn is_available(&self) -> bool {
        let available = self.fetch_tags().await.is_ok();
        debug!(available, "Ollama availability probe");
        available
    }
}

/// Ollama-format chat request
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<InferenceMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama-format chat response
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: OllamaResponseMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[async_trait]
impl InferenceEngine for OllamaInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        if self.config.require_available && !self.is_available().await {
            return Err(InferenceError::Transport {
                provider: PROVIDER,
                message: format!("server at {} is not available", self.config.base_url),
            });
        }

        let model = self.resolve_model(&request).to_string();
        let body = OllamaChatRequest {
            model: &model,
            messages: Self::translate_messages(&request.messages),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature.unwrap_or(self.config.temperature),
                num_predict: request.max_tokens.unwrap_or(self.config.max_tokens),
            },
        };

        debug!("Sending request to Ollama");

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::transport(PROVIDER, e, self.config.timeout_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::transport(PROVIDER, e, self.config.timeout_ms))?;

        if !status.is_success() {
            warn!(status = %status, "Ollama request failed");
            return Err(error_from_status(PROVIDER, status, &text));
        }

        let parsed: OllamaChatResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Protocol {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let content = parsed.message.content.trim().to_string();
        if content.is_empty() {
            return Err(InferenceError::Protocol {
                provider: PROVIDER,
                message: "response content is empty".to_string(),
            });
        }

        let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(prompt), Some(completion)) => Some(TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt.saturating_add(completion),
            }),
            _ => None,
        };

        debug!(tokens = ?usage, "Inference completed");

        Ok(InferenceResponse {
            content,
            model: parsed.model.unwrap_or(model),
            provider: PROVIDER,
            usage,
            finish_reason: parsed.done.then(|| "stop".to_string()),
        })
    }

    async fn health_check(&self) -> bool {
        self.is_available().await
    }

    async fn list_models(&self) -> Vec<String> {
        self.fetch_tags().await.unwrap_or_else(|e| {
            debug!(error = %e, "Could not list Ollama models");
            Vec::new()
        })
    }

    fn name(&self) -> &str {
        PROVIDER.name()
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }
}
