//! Conversation service - One user turn against the inference port

use std::{fmt, sync::Arc};

use domain::{ChatMessage, GenerationParams};
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::InferencePort};

/// System instruction sent first on every request unless overridden
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a virtual phone-support assistant. Be helpful and concise.";

/// Number of user+assistant pairs of history sent with each request
pub const DEFAULT_MAX_HISTORY_TURNS: usize = 4;

/// Input for a single conversational turn
#[derive(Debug, Clone)]
pub struct ProcessMessageInput<'a> {
    /// What the user said or typed
    pub user_text: &'a str,
    /// Earlier messages, oldest first
    pub history: &'a [ChatMessage],
    /// How many user+assistant pairs of `history` to include
    pub max_history_turns: usize,
    /// Overrides the service defaults when set
    pub params: Option<GenerationParams>,
}

impl<'a> ProcessMessageInput<'a> {
    pub const fn new(user_text: &'a str, history: &'a [ChatMessage]) -> Self {
        Self {
            user_text,
            history,
            max_history_turns: DEFAULT_MAX_HISTORY_TURNS,
            params: None,
        }
    }

    #[must_use]
    pub const fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }

    #[must_use]
    pub const fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = Some(params);
        self
    }

    /// The trailing `max_history_turns * 2` history entries
    fn history_window(&self) -> &'a [ChatMessage] {
        let keep = self.max_history_turns.saturating_mul(2);
        let start = self.history.len().saturating_sub(keep);
        &self.history[start..]
    }
}

/// Result of a single conversational turn
#[derive(Debug, Clone)]
pub struct ProcessMessageOutput {
    /// Raw reply text
    pub response: String,
    /// The user's input wrapped as a message
    pub user_message: ChatMessage,
    /// The reply wrapped as a message
    pub assistant_message: ChatMessage,
    /// Provider that answered
    pub provider: String,
    /// Model that answered
    pub model: String,
}

/// Service for handling conversational turns
pub struct ConversationService {
    inference: Arc<dyn InferencePort>,
    system_prompt: String,
    default_params: GenerationParams,
}

impl fmt::Debug for ConversationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationService")
            .field("system_prompt", &self.system_prompt)
            .field("default_params", &self.default_params)
            .finish_non_exhaustive()
    }
}

impl ConversationService {
    /// Create a service with the default system prompt
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self {
            inference,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_params: GenerationParams::default(),
        }
    }

    /// Create a service with a custom system prompt
    pub fn with_system_prompt(
        inference: Arc<dyn InferencePort>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: prompt.into(),
            ..Self::new(inference)
        }
    }

    /// Parameters used when a turn does not supply its own
    #[must_use]
    pub const fn with_default_params(mut self, params: GenerationParams) -> Self {
        self.default_params = params;
        self
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the outbound list: system instruction, trimmed history, new user turn
    fn build_messages(&self, input: &ProcessMessageInput<'_>) -> Vec<ChatMessage> {
        let window = input.history_window();
        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend_from_slice(window);
        messages.push(ChatMessage::user(input.user_text));
        messages
    }

    /// Process one user turn
    ///
    /// The caller's history is not modified; append the returned messages to
    /// keep the conversation going.
    ///
    /// # Errors
    ///
    /// Propagates the inference port's error unchanged.
    #[instrument(skip(self, input), fields(text_len = input.user_text.len(), history = input.history.len()))]
    pub async fn process(
        &self,
        input: ProcessMessageInput<'_>,
    ) -> Result<ProcessMessageOutput, ApplicationError> {
        let messages = self.build_messages(&input);
        let params = input.params.unwrap_or(self.default_params);

        let result = self.inference.generate(&messages, &params).await?;

        debug!(
            provider = %result.provider,
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            "Conversation response generated"
        );

        Ok(ProcessMessageOutput {
            user_message: ChatMessage::user(input.user_text),
            assistant_message: ChatMessage::assistant(result.content.as_str()),
            response: result.content,
            provider: result.provider,
            model: result.model,
        })
    }

    /// Human-readable provider status
    pub fn status(&self) -> String {
        self.inference.status()
    }

    /// Start over from the primary provider
    pub fn reset_providers(&self) {
        self.inference.reset();
    }

    /// Check if the underlying inference is healthy
    pub async fn is_healthy(&self) -> bool {
        self.inference.is_healthy().await
    }

    /// List models on the active backend
    pub async fn available_models(&self) -> Vec<String> {
        self.inference.list_models().await
    }
}
