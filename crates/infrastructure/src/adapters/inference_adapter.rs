//! Inference adapter - Implements InferencePort using ai_core
//!
//! Wraps any [`InferenceEngine`]: the fallback chain in normal operation, or
//! a bare Ollama engine in local mode.

use std::{sync::Arc, time::Instant};

use ai_core::{InferenceEngine, InferenceError, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use domain::{ChatMessage, GenerationParams};
use tracing::{debug, instrument, warn};

/// Adapter from the application's inference port to an ai_core engine
pub struct InferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
}

impl std::fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl InferenceAdapter {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self { engine }
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::Exhausted(attempts) => ApplicationError::ProvidersExhausted {
                attempts: attempts.iter().map(ToString::to_string).collect(),
            },
            e if e.is_quota_class() => ApplicationError::RateLimited(e.to_string()),
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for InferenceAdapter {
    #[instrument(skip(self, messages, params), fields(engine = %self.engine.name(), messages = messages.len()))]
    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::from_messages(messages).with_params(params);

        let response = self.engine.generate(request).await.map_err(|e| {
            warn!(error = %e, "Inference failed");
            Self::map_error(e)
        })?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            provider = %response.provider,
            model = %response.model,
            latency_ms,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            provider: response.provider.name().to_string(),
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        self.engine.health_check().await
    }

    async fn list_models(&self) -> Vec<String> {
        self.engine.list_models().await
    }

    fn status(&self) -> String {
        self.engine.status()
    }

    fn reset(&self) {
        self.engine.reset();
    }
}
