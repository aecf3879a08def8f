//! Recording adapter: delegates to a live generator and logs every call.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::CassetteRecorder;
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Port name used in cassettes for the image generator.
pub const PORT: &str = "image_generator";

/// Records image generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Wrap `inner`, appending each call to `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

fn outcome_json(result: &Result<ImageResponse, ImageError>) -> serde_json::Value {
    match result {
        Ok(response) => match serde_json::to_value(response) {
            Ok(value) => serde_json::json!({ "Ok": value }),
            Err(e) => serde_json::json!({ "Err": format!("unrecordable response: {e}") }),
        },
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            let input = serde_json::to_value(&request).unwrap_or_default();
            self.recorder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(PORT, "generate", input, outcome_json(&result));
            result
        })
    }
}
