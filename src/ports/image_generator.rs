//! Image generator port: the boundary to the hosted generation service.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// A request to generate images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The resolved model identifier (e.g., `"imagen-4.0-generate-001"`).
    pub model: String,
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Aspect ratio (e.g., `"1:1"`, `"16:9"`).
    pub aspect_ratio: String,
    /// Image size (`"1K"`, `"2K"`, `"4K"`).
    pub size: String,
    /// Quality level (`"auto"`, `"low"`, `"medium"`, `"high"`).
    pub quality: String,
    /// Output format (`"png"`, `"jpeg"`, `"webp"`).
    pub format: String,
    /// Number of images to generate.
    pub count: u32,
}

/// A single generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Response containing generated images. May be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images.
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResponse, ImageError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for the given request.
    ///
    /// A response with no images is a successful call; callers decide what
    /// an empty result means.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}

/// Serde helper for carrying `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_bytes_are_base64_in_json() {
        let image = GeneratedImage { data: b"PNG".to_vec(), mime_type: "image/png".into() };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "UE5H");
    }

    #[test]
    fn response_without_images_field_is_empty() {
        let response: ImageResponse = serde_json::from_str("{}").unwrap();
        assert!(response.images.is_empty());
    }
}
