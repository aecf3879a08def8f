//! Replaying adapter: serves recorded outcomes with no network I/O.

use std::sync::{Mutex, PoisonError};

use super::recording::PORT;
use crate::cassette::CassetteReplayer;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Serves recorded image generation results from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_result(&self) -> Result<ImageResponse, ImageError> {
        let output = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_output(PORT, "generate")
            .map_err(ImageError::Service)?;
        decode_outcome(output)
    }
}

/// Turn a recorded `Ok`/`Err` value back into a call result.
fn decode_outcome(output: serde_json::Value) -> Result<ImageResponse, ImageError> {
    if let Some(err) = output.get("Err") {
        let message = err.as_str().unwrap_or("replayed error").to_string();
        return Err(ImageError::Service(message));
    }
    let ok = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(ok)
        .map_err(|e| ImageError::Service(format!("Malformed cassette output: {e}")))
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        tracing::debug!(prompt = %request.prompt, "replaying recorded generation");
        let result = self.next_result();
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replayed_error_keeps_message() {
        let err = decode_outcome(json!({"Err": "quota exceeded"})).unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn replayed_images_are_decoded() {
        let response = decode_outcome(json!({
            "Ok": {"images": [{"data": "UE5H", "mime_type": "image/png"}]}
        }))
        .unwrap();
        assert_eq!(response.images[0].data, b"PNG");
    }

    #[test]
    fn bare_output_is_treated_as_ok() {
        let response = decode_outcome(json!({"images": []})).unwrap();
        assert!(response.images.is_empty());
    }
}
