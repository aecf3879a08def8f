//! Live adapter for Google's Imagen models (`:predict` endpoint).

use reqwest::Client;
use serde::Deserialize;

use super::{api_error, decode_image, parse_body};
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

const IMAGEN_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Imagen generator that calls the Google AI `predict` API.
pub struct ImagenGenerator {
    client: Client,
    api_key: String,
}

impl ImagenGenerator {
    /// Create a new Imagen generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

/// MIME type to request. `predict` only returns PNG or JPEG, so webp is
/// requested as PNG and converted on save.
fn output_mime_type(format: &str) -> &'static str {
    match format {
        "jpeg" => "image/jpeg",
        _ => "image/png",
    }
}

/// Build the `predict` request body.
fn predict_body(request: &ImageRequest) -> serde_json::Value {
    serde_json::json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": {
            "sampleCount": request.count,
            "aspectRatio": request.aspect_ratio,
            "sampleImageSize": request.size,
            "outputOptions": { "mimeType": output_mime_type(&request.format) },
        }
    })
}

/// Extract images from a parsed response. Filtered predictions carry no bytes
/// and are skipped.
fn collect_images(
    parsed: PredictResponse,
    fallback_mime: &str,
) -> Result<Vec<GeneratedImage>, crate::error::ImageError> {
    let mut images = Vec::new();
    for prediction in parsed.predictions {
        let Some(encoded) = prediction.bytes_base64_encoded else {
            if let Some(reason) = prediction.rai_filtered_reason {
                tracing::warn!(%reason, "Imagen filtered a prediction");
            }
            continue;
        };
        let data = decode_image(&encoded)?;
        let mime_type = prediction.mime_type.unwrap_or_else(|| fallback_mime.to_string());
        images.push(GeneratedImage { data, mime_type });
    }
    Ok(images)
}

impl ImageGenerator for ImagenGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{IMAGEN_API_BASE}/{}:predict", request.model);
            tracing::debug!(%url, count = request.count, "calling Imagen");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&predict_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(api_error(status.as_u16(), &response_text));
            }

            let parsed: PredictResponse = parse_body(&response_text)?;
            let images = collect_images(parsed, output_mime_type(&request.format))?;
            Ok(ImageResponse { images })
        })
    }
}

// --- Imagen API response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ImageRequest {
        ImageRequest {
            model: "imagen-4.0-generate-001".into(),
            prompt: "a cat".into(),
            aspect_ratio: "1:1".into(),
            size: "1K".into(),
            quality: "auto".into(),
            format: "png".into(),
            count: 1,
        }
    }

    #[test]
    fn body_requests_one_png() {
        let body = predict_body(&request());
        assert_eq!(body["instances"][0]["prompt"], "a cat");
        assert_eq!(body["parameters"]["sampleCount"], 1);
        assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/png");
    }

    #[test]
    fn webp_is_requested_as_png() {
        let body = predict_body(&ImageRequest { format: "webp".into(), ..request() });
        assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/png");

        let body = predict_body(&ImageRequest { format: "jpeg".into(), ..request() });
        assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
    }

    #[test]
    fn empty_predictions_yield_no_images() {
        let parsed: PredictResponse = parse_body("{}").unwrap();
        assert!(collect_images(parsed, "image/png").unwrap().is_empty());
    }

    #[test]
    fn filtered_predictions_are_skipped() {
        let parsed: PredictResponse = parse_body(
            r#"{"predictions": [
                {"raiFilteredReason": "blocked"},
                {"bytesBase64Encoded": "UE5H", "mimeType": "image/png"}
            ]}"#,
        )
        .unwrap();
        let images = collect_images(parsed, "image/png").unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].data, b"PNG");
    }

    #[test]
    fn missing_mime_falls_back_to_requested_format() {
        let parsed: PredictResponse =
            parse_body(r#"{"predictions": [{"bytesBase64Encoded": "UE5H"}]}"#).unwrap();
        let images = collect_images(parsed, "image/jpeg").unwrap();
        assert_eq!(images[0].mime_type, "image/jpeg");
    }
}
