//! Provider failover across the hosted and local engines
//!
//! [`FallbackEngine`] looks like any other [`InferenceEngine`]. Internally it
//! keeps an active provider and a fallback counter. When the active provider
//! fails with a quota-class error it advances along
//! `OpenAi -> DeepSeek -> Ollama` and retries, up to [`MAX_FALLBACKS`] times
//! over its lifetime until [`FallbackEngine::reset`] is called.
//!
//! ```text
//!   OpenAi ──quota──▶ DeepSeek ──any failure──▶ Ollama ──failure──▶ Exhausted
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{FailedAttempt, InferenceError};
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse};
use crate::provider::ProviderKind;

/// Ceiling on provider switches between resets
pub const MAX_FALLBACKS: u8 = 2;

/// Active provider and number of switches made so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackState {
    pub active: ProviderKind,
    pub fallback_count: u8,
}

impl Default for FallbackState {
    fn default() -> Self {
        Self {
            active: ProviderKind::OpenAi,
            fallback_count: 0,
        }
    }
}

impl FallbackState {
    /// Move to the next provider if the ceiling and the chain allow it
    fn advance(&mut self) -> Option<ProviderKind> {
        if self.fallback_count >= MAX_FALLBACKS {
            return None;
        }
        let next = self.active.next()?;
        self.active = next;
        self.fallback_count += 1;
        Some(next)
    }
}

/// Inference engine that fails over between providers on quota errors
pub struct FallbackEngine {
    openai: Arc<dyn InferenceEngine>,
    deepseek: Arc<dyn InferenceEngine>,
    ollama: Arc<dyn InferenceEngine>,
    state: Mutex<FallbackState>,
}

impl std::fmt::Debug for FallbackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackEngine")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl FallbackEngine {
    /// Build the chain from one engine per provider
    pub fn new(
        openai: Arc<dyn InferenceEngine>,
        deepseek: Arc<dyn InferenceEngine>,
        ollama: Arc<dyn InferenceEngine>,
    ) -> Self {
        info!("Initialized fallback engine (openai -> deepseek -> ollama)");
        Self {
            openai,
            deepseek,
            ollama,
            state: Mutex::new(FallbackState::default()),
        }
    }

    fn engine(&self, provider: ProviderKind) -> &Arc<dyn InferenceEngine> {
        match provider {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::DeepSeek => &self.deepseek,
            ProviderKind::Ollama => &self.ollama,
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> FallbackState {
        *self.state.lock()
    }

    /// Provider that will receive the next request
    #[must_use]
    pub fn active_provider(&self) -> ProviderKind {
        self.state.lock().active
    }

    /// Number of provider switches since construction or the last reset
    #[must_use]
    pub fn fallback_count(&self) -> u8 {
        self.state.lock().fallback_count
    }

    /// e.g. `Active provider: OPENAI, fallbacks used: 0/2`
    #[must_use]
    pub fn current_status(&self) -> String {
        let state = self.state();
        format!(
            "Active provider: {}, fallbacks used: {}/{MAX_FALLBACKS}",
            state.active.name().to_uppercase(),
            state.fallback_count
        )
    }

    fn advance(&self) -> Option<ProviderKind> {
        self.state.lock().advance()
    }
}

#[async_trait]
impl InferenceEngine for FallbackEngine {
    #[instrument(skip(self, request))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let mut provider = self.active_provider();
        let mut attempts: Vec<FailedAttempt> = Vec::new();

        loop {
            debug!(provider = %provider, attempt = attempts.len() + 1, "Attempting generation");

            let err = match self.engine(provider).generate(request.clone()).await {
                Ok(response) => {
                    if !attempts.is_empty() {
                        info!(provider = %provider, failed = attempts.len(), "Generation succeeded after fallback");
                    }
                    return Ok(response);
                },
                Err(err) => err,
            };

            // Only a quota-class first failure starts the chain
            if attempts.is_empty() && !err.is_quota_class() {
                return Err(err);
            }

            let Some(next) = self.advance() else {
                if attempts.is_empty() {
                    warn!(provider = %provider, error = %err, "Fallback ceiling reached");
                    return Err(err);
                }
                attempts.push(FailedAttempt::new(provider, &err));
                warn!(attempts = attempts.len(), "All providers failed");
                return Err(InferenceError::Exhausted(attempts));
            };

            warn!(from = %provider, to = %next, error = %err, "Falling back to next provider");
            attempts.push(FailedAttempt::new(provider, &err));
            provider = next;
        }
    }

    async fn health_check(&self) -> bool {
        self.engine(self.active_provider()).health_check().await
    }

    async fn list_models(&self) -> Vec<String> {
        self.engine(self.active_provider()).list_models().await
    }

    fn name(&self) -> &str {
        "fallback"
    }

    fn default_model(&self) -> String {
        self.engine(self.active_provider()).default_model()
    }

    fn status(&self) -> String {
        self.current_status()
    }

    fn reset(&self) {
        *self.state.lock() = FallbackState::default();
        info!("Fallback state reset to openai");
    }
}
