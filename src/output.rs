//! Image presentation: `data:` URIs for the browser, files for the CLI.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::ImageError;
use crate::params::format_extension;

/// Render image bytes as a `data:<mime>;base64,<payload>` URI.
#[must_use]
pub fn to_data_uri(mime_type: &str, data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!("data:{mime_type};base64,{encoded}")
}

/// Split a base64 `data:` URI back into its MIME type and bytes.
///
/// # Errors
///
/// Returns an error if the URI is not a base64 `data:` URI or the payload is malformed.
#[cfg(test)]
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), String> {
    let rest = uri.strip_prefix("data:").ok_or("not a data: URI")?;
    let (mime_type, payload) = rest.split_once(";base64,").ok_or("data: URI is not base64")?;
    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("invalid base64 payload: {e}"))?;
    Ok((mime_type.to_string(), data))
}

/// Generate an output filename from a prompt and format.
///
/// Sanitizes the first 50 characters of the prompt to kebab-case,
/// appends a UTC timestamp, and adds the extension for `format`.
#[must_use]
pub fn auto_filename(prompt: &str, format: &str) -> String {
    let sanitized = sanitize_for_filename(prompt, 50);
    let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let ext = format_extension(format);
    format!("{sanitized}-{timestamp}.{ext}")
}

/// Lowercase ASCII alphanumerics joined by single hyphens, at most `max_len` bytes.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let words: Vec<String> = input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let mut result = String::with_capacity(max_len);
    for word in words {
        let sep = usize::from(!result.is_empty());
        let room = max_len.saturating_sub(result.len() + sep);
        if room == 0 {
            break;
        }
        if sep == 1 {
            result.push('-');
        }
        result.push_str(&word[..word.len().min(room)]);
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, prompt: &str, format: &str) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(auto_filename(prompt, format)), PathBuf::from)
}

/// Save raw image bytes, re-encoding when the source MIME type differs from `target_format`.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    data: &[u8],
    source_mime: &str,
    target_format: &str,
    output_path: &Path,
) -> Result<(), ImageError> {
    if mime_matches_format(source_mime, target_format) {
        std::fs::write(output_path, data).map_err(ImageError::Io)
    } else {
        tracing::debug!(%source_mime, %target_format, "converting image format");
        convert_and_save(data, target_format, output_path)
    }
}

fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

fn convert_and_save(data: &[u8], target_format: &str, output_path: &Path) -> Result<(), ImageError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(ImageError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}
