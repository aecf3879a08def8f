//! `config.toml`: API keys, generation defaults, and the UI listen address.
//!
//! Every section is optional. Keys in the environment win over keys in the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::DEFAULT_MODEL;

/// Parsed `config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// `[keys]`
    #[serde(default)]
    pub keys: KeysConfig,

    /// `[defaults]`, applied where the matching flag is absent.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// `[server]`
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider keys stored in the file.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Google AI key, shared by Imagen and Gemini models.
    pub gemini: Option<String>,
    /// `OpenAI` API key.
    pub openai: Option<String>,
}

/// Generation options used when no flag overrides them.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Model name or alias.
    pub model: String,
    /// Aspect ratio, e.g. `"1:1"`.
    pub aspect_ratio: String,
    /// Size tier.
    pub size: String,
    /// Quality level, used by `OpenAI` models.
    pub quality: String,
    /// `png`, `jpeg` or `webp`.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            aspect_ratio: "1:1".to_string(),
            size: "1K".to_string(),
            quality: "auto".to_string(),
            format: "png".to_string(),
        }
    }
}

/// Settings for `--serve`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the UI listens on.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: "127.0.0.1:8080".to_string() }
    }
}

impl Config {
    /// Read `path`. A missing file is not an error and yields [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns a message naming the path when the file is unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Google AI key: `GEMINI_API_KEY`, then `API_KEY`, then the file.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("API_KEY"))
            .or_else(|| self.keys.gemini.clone())
    }

    /// `OpenAI` key: `OPENAI_API_KEY`, then the file.
    #[must_use]
    pub fn openai_key(&self) -> Option<String> {
        non_empty_env("OPENAI_API_KEY").or_else(|| self.keys.openai.clone())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// `--config`, else `PIXPROMPT_CONFIG`, else `~/.config/pixprompt/config.toml`.
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PIXPROMPT_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/pixprompt/config.toml")
    } else {
        PathBuf::from("pixprompt.toml")
    }
}
