//! Request option validation and provider-specific translation.

use crate::model::Provider;

const IMAGEN_RATIOS: &[&str] = &["1:1", "3:4", "4:3", "9:16", "16:9"];
const GEMINI_RATIOS: &[&str] =
    &["1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9"];
const OPENAI_RATIOS: &[&str] =
    &["1:1", "16:9", "9:16", "3:2", "2:3", "4:3", "3:4", "5:4", "4:5", "21:9"];

/// Translate an aspect ratio string to `OpenAI` pixel dimensions.
///
/// `OpenAI` supports: `1024x1024`, `1536x1024`, `1024x1536`, `auto`.
#[must_use]
pub fn aspect_ratio_to_openai_size(ratio: &str) -> &'static str {
    match ratio {
        "1:1" => "1024x1024",
        "16:9" | "3:2" | "4:3" | "21:9" | "5:4" => "1536x1024",
        "9:16" | "2:3" | "3:4" | "4:5" => "1024x1536",
        _ => "auto",
    }
}

/// Validate that an aspect ratio is supported by the given provider.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn validate_aspect_ratio(ratio: &str, provider: Provider) -> Result<(), String> {
    let valid = match provider {
        Provider::Imagen => IMAGEN_RATIOS,
        Provider::Gemini => GEMINI_RATIOS,
        Provider::OpenAi => OPENAI_RATIOS,
    };

    if valid.contains(&ratio) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported aspect ratio '{ratio}' for {}. Valid: {}",
            provider.label(),
            valid.join(", ")
        ))
    }
}

/// Validate the image size parameter. Imagen tops out at `2K`.
///
/// # Errors
///
/// Returns an error if the size is not recognized.
pub fn validate_size(size: &str, provider: Provider) -> Result<(), String> {
    match (size, provider) {
        ("1K" | "2K", _) | ("4K", Provider::Gemini | Provider::OpenAi) => Ok(()),
        (_, Provider::Imagen) => Err(format!("Unsupported size '{size}' for Imagen. Valid: 1K, 2K")),
        _ => Err(format!("Unsupported size '{size}'. Valid: 1K, 2K, 4K")),
    }
}

/// Validate the quality parameter.
///
/// # Errors
///
/// Returns an error if the quality value is not recognized.
pub fn validate_quality(quality: &str) -> Result<(), String> {
    match quality {
        "auto" | "low" | "medium" | "high" => Ok(()),
        _ => Err(format!("Unsupported quality '{quality}'. Valid: auto, low, medium, high")),
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// MIME type for an output format.
#[must_use]
pub fn format_mime_type(format: &str) -> &'static str {
    match format {
        "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        _ => "png",
    }
}
