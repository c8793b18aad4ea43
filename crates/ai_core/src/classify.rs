//! Mapping of non-success HTTP responses onto [`InferenceError`] variants

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{InferenceError, is_quota_message};
use crate::provider::ProviderKind;

/// OpenAI-style `{"error": {...}}` or Ollama-style `{"error": "..."}` body
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(default)]
        message: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        code: Option<serde_json::Value>,
    },
    Plain(String),
}

struct VendorError {
    message: String,
    markers: Vec<String>,
}

fn parse_vendor_error(body: &str) -> Option<VendorError> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(match envelope.error {
        ErrorBody::Detailed {
            message,
            kind,
            code,
        } => {
            let code = code.map(|c| match c {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
            let markers = kind.iter().chain(code.iter()).cloned().collect();
            VendorError {
                message: message.unwrap_or_else(|| body.to_string()),
                markers,
            }
        },
        ErrorBody::Plain(message) => VendorError {
            message,
            markers: Vec::new(),
        },
    })
}

/// Classify a non-success response
///
/// The status code and the vendor's error type/code decide first; the
/// message keeps the vendor text so the substring check in
/// [`InferenceError::is_quota_class`] can still catch anything missed here.
pub fn error_from_status(provider: ProviderKind, status: StatusCode, body: &str) -> InferenceError {
    let vendor = parse_vendor_error(body);
    let detail = vendor
        .as_ref()
        .map_or_else(|| body.trim().to_string(), |v| v.message.clone());
    let message = format!("HTTP {}: {detail}", status.as_u16());

    let vendor_quota = vendor
        .as_ref()
        .is_some_and(|v| v.markers.iter().any(|m| is_quota_message(m)));

    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
            InferenceError::Quota { provider, message }
        },
        _ if vendor_quota => InferenceError::Quota { provider, message },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            InferenceError::Auth { provider, message }
        },
        _ => InferenceError::Server {
            provider,
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENAI_QUOTA_BODY: &str = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;

    #[test]
    fn too_many_requests_is_quota() {
        let err = error_from_status(ProviderKind::OpenAi, StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, InferenceError::Quota { .. }));
    }

    #[test]
    fn payment_required_is_quota() {
        let err = error_from_status(ProviderKind::DeepSeek, StatusCode::PAYMENT_REQUIRED, "{}");
        assert!(matches!(err, InferenceError::Quota { provider: ProviderKind::DeepSeek, .. }));
    }

    #[test]
    fn vendor_quota_code_wins_over_status() {
        let err = error_from_status(ProviderKind::OpenAi, StatusCode::BAD_REQUEST, OPENAI_QUOTA_BODY);
        assert!(matches!(err, InferenceError::Quota { .. }));
        assert!(err.to_string().contains("You exceeded your current quota"));
    }

    #[test]
    fn unauthorized_is_auth() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let err = error_from_status(ProviderKind::OpenAi, StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, InferenceError::Auth { .. }));
        assert!(!err.is_quota_class());
    }

    #[test]
    fn other_status_is_server_error() {
        let err = error_from_status(
            ProviderKind::Ollama,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"model 'llama2' not found"}"#,
        );
        match err {
            InferenceError::Server { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500: model 'llama2' not found");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn numeric_vendor_code_is_compared_as_text() {
        let body = r#"{"error":{"message":"busy","code":429}}"#;
        let err = error_from_status(ProviderKind::DeepSeek, StatusCode::SERVICE_UNAVAILABLE, body);
        assert!(matches!(err, InferenceError::Quota { .. }));
    }

    #[test]
    fn non_json_body_is_kept_as_detail() {
        let err = error_from_status(ProviderKind::OpenAi, StatusCode::BAD_GATEWAY, "  upstream down ");
        assert!(err.to_string().ends_with("HTTP 502: upstream down"));
    }
}
