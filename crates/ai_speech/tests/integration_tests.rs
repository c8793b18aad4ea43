//! Integration tests for ai_speech crate
//!
//! Tests the record-then-transcribe flow with a scripted recorder and a
//! mocked Whisper API.

use ai_speech::{
    AudioData, AudioFormat, AudioRecorder, MicrophoneRecorder, OpenAiTranscriber, RecorderConfig,
    SpeechConfig, SpeechError, SpeechToText,
};
use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test configuration pointing to mock server
fn test_config(base_url: &str) -> SpeechConfig {
    SpeechConfig {
        openai_api_key: Some(SecretString::from("test-api-key".to_string())),
        openai_base_url: base_url.to_string(),
        stt_model: "whisper-1".to_string(),
        language: "pt-BR".to_string(),
        timeout_ms: 5000,
    }
}

/// Minimal WAV header
fn mock_wav_audio() -> Vec<u8> {
    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
    data.extend_from_slice(b"WAVEfmt ");
    data
}

#[tokio::test]
async fn transcription_sends_model_and_language() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("utterance.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "Qual é o horário de atendimento?"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transcriber = OpenAiTranscriber::new(test_config(&mock_server.uri())).unwrap();
    let language = transcriber.default_language();
    let audio = AudioData::new(mock_wav_audio(), AudioFormat::Wav);

    let transcription = transcriber
        .transcribe(audio, language.as_deref())
        .await
        .unwrap();

    assert_eq!(transcription.text, "Qual é o horário de atendimento?");
    assert_eq!(transcription.language.as_deref(), Some("pt"));
}

#[tokio::test]
async fn silent_clip_yields_empty_transcription() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "   "})))
        .mount(&mock_server)
        .await;

    let transcriber = OpenAiTranscriber::new(test_config(&mock_server.uri())).unwrap();
    let audio = AudioData::new(mock_wav_audio(), AudioFormat::Wav);

    let transcription = transcriber.transcribe(audio, None).await.unwrap();

    assert!(transcription.is_empty());
}

#[tokio::test]
async fn server_error_is_transcription_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let transcriber = OpenAiTranscriber::new(test_config(&mock_server.uri())).unwrap();
    let audio = AudioData::new(mock_wav_audio(), AudioFormat::Wav);

    let err = transcriber.transcribe(audio, None).await.unwrap_err();

    assert!(matches!(err, SpeechError::TranscriptionFailed(_)));
    assert!(err.to_string().contains("boom"));
}

#[cfg(unix)]
#[tokio::test]
async fn recorded_clip_is_transcribed() {
    use std::os::unix::fs::PermissionsExt;

    // Stand-in recorder: writes a WAV header to the path given as last argument
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fake-arecord");
    std::fs::write(
        &script,
        "#!/bin/sh\nfor last; do :; done\nprintf 'RIFF0000WAVEfmt ' > \"$last\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let recorder = MicrophoneRecorder::new(RecorderConfig {
        command: script.to_string_lossy().to_string(),
        record_seconds: 1,
        ..Default::default()
    })
    .unwrap();

    let audio = recorder.record().await.unwrap();
    assert_eq!(audio.format(), AudioFormat::Wav);
    assert!(audio.data().starts_with(b"RIFF"));
    assert_eq!(audio.duration_ms(), Some(1000));

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "olá"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transcriber = OpenAiTranscriber::new(test_config(&mock_server.uri())).unwrap();
    let transcription = transcriber.transcribe(audio, Some("pt")).await.unwrap();

    assert_eq!(transcription.text, "olá");
}
