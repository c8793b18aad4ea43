//! OpenAI-compatible chat-completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::classify::error_from_status;
use crate::config::HostedConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
use crate::provider::ProviderKind;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Inference engine for a hosted, OpenAI-compatible provider
pub struct HostedInferenceEngine {
    provider: ProviderKind,
    client: Client,
    config: HostedConfig,
    api_key: SecretString,
}

impl std::fmt::Debug for HostedInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedInferenceEngine")
            .field("provider", &self.provider)
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}

impl HostedInferenceEngine {
    /// Create a new hosted engine
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Configuration` if no credential is configured
    /// or the HTTP client cannot be built.
    pub fn new(provider: ProviderKind, config: HostedConfig) -> Result<Self, InferenceError> {
        let api_key = match &config.api_key {
            Some(key) if config.has_api_key() => key.clone(),
            _ => {
                return Err(InferenceError::Configuration(format!(
                    "{provider}: API key is required"
                )));
            },
        };

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            provider = %provider,
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized hosted inference engine"
        );

        Ok(Self {
            provider,
            client,
            config,
            api_key,
        })
    }

    /// OpenAI engine with the given credential and otherwise default settings
    pub fn openai(api_key: impl Into<String>) -> Result<Self, InferenceError> {
        Self::new(ProviderKind::OpenAi, HostedConfig::openai().with_api_key(api_key))
    }

    /// DeepSeek engine with the given credential and otherwise default settings
    pub fn deepseek(api_key: impl Into<String>) -> Result<Self, InferenceError> {
        Self::new(ProviderKind::DeepSeek, HostedConfig::deepseek().with_api_key(api_key))
    }

    /// Provider this engine talks to
    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        self.provider
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
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

    fn transport_error(&self, err: reqwest::Error) -> InferenceError {
        InferenceError::transport(self.provider, err, self.config.timeout_ms)
    }

    fn protocol_error(&self, message: impl Into<String>) -> InferenceError {
        InferenceError::Protocol {
            provider: self.provider,
            message: message.into(),
        }
    }

    /// Fetch the advertised model ids
    async fn fetch_models(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(self.api_url("models"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(self.provider, status, &body));
        }

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| self.protocol_error(e.to_string()))?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

/// OpenAI-format chat request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [InferenceMessage],
    max_tokens: u32,
    temperature: f32,
}

/// OpenAI-format chat response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[async_trait]
impl InferenceEngine for HostedInferenceEngine {
    #[instrument(skip(self, request), fields(provider = %self.provider, model = %self.resolve_model(&request)))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let model = self.resolve_model(&request).to_string();
        let body = ChatCompletionRequest {
            model: &model,
            messages: &request.messages,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
        };

        debug!(messages = request.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = %status, "Chat completion request failed");
            return Err(error_from_status(self.provider, status, &text));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| self.protocol_error(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.protocol_error("response has no choices"))?;

        let content = choice
            .message
            .content
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(self.protocol_error("response content is empty"));
        }

        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        debug!(tokens = ?usage, "Chat completion finished");

        Ok(InferenceResponse {
            content,
            model: parsed.model.unwrap_or(model),
            provider: self.provider,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> bool {
        match self.fetch_models().await {
            Ok(_) => true,
            Err(e) => {
                debug!(provider = %self.provider, error = %e, "Health check failed");
                false
            },
        }
    }

    async fn list_models(&self) -> Vec<String> {
        self.fetch_models().await.unwrap_or_else(|e| {
            debug!(provider = %self.provider, error = %e, "Model listing failed");
            Vec::new()
        })
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }
}
