//! Wiring - Build services and adapters from [`AppConfig`]

use std::sync::Arc;

use ai_core::{
    FallbackEngine, HostedInferenceEngine, InferenceEngine, OllamaInferenceEngine, ProviderKind,
};
use ai_speech::{
    CommandSpeaker, ConsoleSpeaker, MicrophoneRecorder, OpenAiTranscriber, Speaker,
};
use application::{
    ConversationService, VoiceInputPort, VoiceOutputPort, error::ApplicationError,
};
use tracing::{info, warn};

use crate::{
    adapters::{InferenceAdapter, VoiceInputAdapter, VoiceOutputAdapter},
    config::{AppConfig, InferenceMode},
};

/// Everything an interactive session needs
pub struct Components {
    pub conversation: ConversationService,
    /// Absent when voice is off or transcription cannot be configured
    pub voice_input: Option<Arc<dyn VoiceInputPort>>,
    pub voice_output: Arc<dyn VoiceOutputPort>,
    /// Direct handle on the local server for availability reports
    pub local: Arc<OllamaInferenceEngine>,
}

impl std::fmt::Debug for Components {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Components")
            .field("conversation", &self.conversation)
            .field("voice_input", &self.voice_input.is_some())
            .finish_non_exhaustive()
    }
}

impl Components {
    /// Build all components; `voice` additionally requires `speech.enabled`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` when the settings are
    /// invalid or a client cannot be constructed.
    pub fn build(config: &AppConfig, voice: bool) -> Result<Self, ApplicationError> {
        config
            .validate()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        let local = Arc::new(build_local_engine(config)?);
        let engine = build_inference_engine(config, Arc::clone(&local))?;
        let conversation = build_conversation_service(config, engine)?;

        let voice = voice && config.speech.enabled;
        let voice_input = if voice { build_voice_input(config) } else { None };

        Ok(Self {
            conversation,
            voice_input,
            voice_output: build_voice_output(config, voice),
            local,
        })
    }
}

/// Engine for the local Ollama server
///
/// In local mode the server is probed before every generation. As the last
/// link of the fallback chain it is only probed when configured to be.
pub fn build_local_engine(config: &AppConfig) -> Result<OllamaInferenceEngine, ApplicationError> {
    let mut client_config = config.ollama.to_client_config(&config.generation);
    client_config.require_available |= config.mode == InferenceMode::Local;
    OllamaInferenceEngine::new(client_config)
        .map_err(|e| ApplicationError::Configuration(e.to_string()))
}

/// Engine selected by `mode`: the full chain, or the local server alone
pub fn build_inference_engine(
    config: &AppConfig,
    local: Arc<OllamaInferenceEngine>,
) -> Result<Arc<dyn InferenceEngine>, ApplicationError> {
    match config.mode {
        InferenceMode::Local => {
            info!(model = %config.ollama.model, "Using local Ollama server only");
            let engine: Arc<dyn InferenceEngine> = local;
            Ok(engine)
        },
        InferenceMode::Fallback => {
            let hosted = |provider: ProviderKind| {
                let settings = match provider {
                    ProviderKind::DeepSeek => &config.deepseek,
                    _ => &config.openai,
                };
                HostedInferenceEngine::new(provider, settings.to_client_config(&config.generation))
                    .map_err(|e| ApplicationError::Configuration(e.to_string()))
            };
            let openai = hosted(ProviderKind::OpenAi)?;
            let deepseek = hosted(ProviderKind::DeepSeek)?;
            info!("Using provider fallback chain");
            Ok(Arc::new(FallbackEngine::new(
                Arc::new(openai),
                Arc::new(deepseek),
                local,
            )))
        },
    }
}

/// Conversation use case over `engine`, with the configured prompt and sampling
pub fn build_conversation_service(
    config: &AppConfig,
    engine: Arc<dyn InferenceEngine>,
) -> Result<ConversationService, ApplicationError> {
    let params = config
        .generation
        .to_params()
        .map_err(ApplicationError::Configuration)?;
    let port = Arc::new(InferenceAdapter::new(engine));

    let service = match &config.conversation.system_prompt {
        Some(prompt) => ConversationService::with_system_prompt(port, prompt.clone()),
        None => ConversationService::new(port),
    };
    Ok(service.with_default_params(params))
}

/// Microphone plus Whisper, or `None` when either cannot be set up
pub fn build_voice_input(config: &AppConfig) -> Option<Arc<dyn VoiceInputPort>> {
    let speech = config
        .speech
        .speech_config(config.openai.api_key.clone(), &config.openai.base_url);

    let transcriber = match OpenAiTranscriber::new(speech) {
        Ok(transcriber) => transcriber,
        Err(e) => {
            warn!(error = %e, "Voice input disabled");
            return None;
        },
    };
    let recorder = match MicrophoneRecorder::new(config.speech.recorder_config()) {
        Ok(recorder) => recorder,
        Err(e) => {
            warn!(error = %e, "Voice input disabled");
            return None;
        },
    };

    let language = transcriber.default_language();
    Some(Arc::new(VoiceInputAdapter::new(
        Arc::new(recorder),
        Arc::new(transcriber),
        language,
    )))
}

/// Speech command when voice is on, otherwise a silent speaker
pub fn build_voice_output(config: &AppConfig, voice: bool) -> Arc<dyn VoiceOutputPort> {
    let speaker: Arc<dyn Speaker> = if voice {
        match CommandSpeaker::new(config.speech.speaker_config()) {
            Ok(speaker) => Arc::new(speaker),
            Err(e) => {
                warn!(error = %e, "Voice output disabled");
                Arc::new(ConsoleSpeaker)
            },
        }
    } else {
        Arc::new(ConsoleSpeaker)
    };
    Arc::new(VoiceOutputAdapter::new(speaker))
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn fallback_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.openai.api_key = Some(SecretString::from("sk-openai"));
        config.deepseek.api_key = Some(SecretString::from("sk-deepseek"));
        config
    }

    fn local_config() -> AppConfig {
        AppConfig {
            mode: InferenceMode::Local,
            ..AppConfig::default()
        }
    }

    #[test]
    fn fallback_mode_builds_the_chain() {
        let components = Components::build(&fallback_config(), false).unwrap();
        assert_eq!(
            components.conversation.status(),
            "Active provider: OPENAI, fallbacks used: 0/2"
        );
        assert!(components.voice_input.is_none());
    }

    #[test]
    fn local_mode_uses_ollama_only() {
        let components = Components::build(&local_config(), false).unwrap();
        assert_eq!(components.conversation.status(), "ollama (llama2)");
    }

    #[test]
    fn missing_keys_fail_in_fallback_mode() {
        let err = Components::build(&AppConfig::default(), false).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(ref m) if m.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn custom_system_prompt_is_applied() {
        let mut config = local_config();
        config.conversation.system_prompt = Some("Answer in Portuguese.".to_string());
        let engine: Arc<dyn InferenceEngine> =
            Arc::new(build_local_engine(&config).unwrap());
        let service = build_conversation_service(&config, engine).unwrap();
        assert_eq!(service.system_prompt(), "Answer in Portuguese.");
    }

    #[test]
    fn voice_input_requires_transcription_key() {
        assert!(build_voice_input(&local_config()).is_none());
        assert!(build_voice_input(&fallback_config()).is_some());
    }

    #[test]
    fn disabled_speech_turns_voice_off() {
        let mut config = fallback_config();
        config.speech.enabled = false;
        let components = Components::build(&config, true).unwrap();
        assert!(components.voice_input.is_none());
    }

    #[tokio::test]
    async fn silent_output_never_fails() {
        let output = build_voice_output(&local_config(), false);
        tokio_test::assert_ok!(output.speak("hello").await);
    }
}
