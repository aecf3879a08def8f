//! Live adapter for the `OpenAI` Images API.

use reqwest::Client;
use serde::Deserialize;

use super::{api_error, decode_image, parse_body};
use crate::params::{aspect_ratio_to_openai_size, format_mime_type};
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/images/generations";

/// Live `OpenAI` image generator.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
}

impl OpenAiGenerator {
    /// Create a new `OpenAI` generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

fn generations_body(request: &ImageRequest) -> serde_json::Value {
    // Only the 1K tier maps to fixed dimensions.
    let size = if request.size == "1K" {
        aspect_ratio_to_openai_size(&request.aspect_ratio)
    } else {
        "auto"
    };

    serde_json::json!({
        "model": request.model,
        "prompt": request.prompt,
        "n": request.count,
        "size": size,
        "quality": request.quality,
        "output_format": request.format,
    })
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            tracing::debug!(model = %request.model, "calling OpenAI");

            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&generations_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(api_error(status.as_u16(), &response_text));
            }

            let parsed: OpenAiResponse = parse_body(&response_text)?;
            let mime_type = format_mime_type(&request.format);
            let images = parsed
                .data
                .iter()
                .filter_map(|item| item.b64_json.as_deref())
                .map(|encoded| {
                    decode_image(encoded)
                        .map(|data| GeneratedImage { data, mime_type: mime_type.to_string() })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ImageResponse { images })
        })
    }
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    b64_json: Option<String>,
}
