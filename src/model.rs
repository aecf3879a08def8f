//! Model name resolution and provider detection.

/// Supported API providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Imagen models served through the `predict` endpoint.
    Imagen,
    /// Google Gemini image models.
    Gemini,
    /// `OpenAI` Images API.
    OpenAi,
}

impl Provider {
    /// Human-readable provider name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Imagen => "Imagen",
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }
}

/// Short name aliases for popular models.
const ALIASES: &[(&str, &str)] = &[
    ("imagen-4", "imagen-4.0-generate-001"),
    ("imagen-4-ultra", "imagen-4.0-ultra-generate-001"),
    ("imagen-4-fast", "imagen-4.0-fast-generate-001"),
    ("nano-banana", "gemini-2.5-flash-image"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
    ("gpt-1.5", "gpt-image-1.5"),
    ("gpt-1", "gpt-image-1"),
    ("gpt-1-mini", "gpt-image-1-mini"),
];

/// Model used when neither the CLI nor the config names one.
pub const DEFAULT_MODEL: &str = "imagen-4";

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Detect the provider from a resolved model name.
///
/// # Errors
///
/// Returns an error if the model name doesn't match a known provider prefix.
pub fn detect_provider(model: &str) -> Result<Provider, String> {
    if model.starts_with("imagen") {
        Ok(Provider::Imagen)
    } else if model.starts_with("gemini") {
        Ok(Provider::Gemini)
    } else if model.starts_with("gpt-image") {
        Ok(Provider::OpenAi)
    } else {
        Err(format!(
            "Unknown provider for model '{model}'. Expected 'imagen-*', 'gemini-*' or 'gpt-image-*'."
        ))
    }
}
