//! Live adapters that call hosted image-generation APIs over HTTP.

pub mod gemini;
pub mod imagen;
pub mod openai;

use base64::Engine;
use serde::Deserialize;

use crate::error::ImageError;

/// Longest slice of a raw response body carried into an error message.
const MAX_BODY_IN_ERROR: usize = 500;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Build an [`ImageError::Api`] from a non-success response.
///
/// Google and `OpenAI` both wrap failures as `{"error": {"message": ...}}`;
/// anything else is passed through truncated.
pub(crate) fn api_error(status: u16, body: &str) -> ImageError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| truncate(body), |envelope| envelope.error.message);
    ImageError::Api { status, message }
}

/// Decode a base64 image payload from a successful response.
pub(crate) fn decode_image(encoded: &str) -> Result<Vec<u8>, ImageError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ImageError::Api { status: 200, message: format!("Failed to decode base64: {e}") })
}

/// Parse a successful response body.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ImageError> {
    serde_json::from_str(body).map_err(|e| ImageError::Api {
        status: 200,
        message: format!("Failed to parse response: {e}. Body: {}", truncate(body)),
    })
}

fn truncate(body: &str) -> String {
    if body.chars().count() > MAX_BODY_IN_ERROR {
        let head: String = body.chars().take(MAX_BODY_IN_ERROR).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_json_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        match api_error(429, body) {
            ImageError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_truncates_plain_bodies() {
        let body = "x".repeat(2000);
        match api_error(502, &body) {
            ImageError::Api { message, .. } => {
                assert!(message.ends_with("..."));
                assert_eq!(message.len(), MAX_BODY_IN_ERROR + 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(600);
        assert!(truncate(&body).starts_with('é'));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_image("not base64!!").is_err());
        assert_eq!(decode_image("UE5H").unwrap(), b"PNG");
    }
}
