//! Builds the image generator for the selected mode (live, recording, replaying).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::live::imagen::ImagenGenerator;
use crate::adapters::live::openai::OpenAiGenerator;
use crate::adapters::recording::RecordingImageGenerator;
use crate::adapters::replaying::ReplayingImageGenerator;
use crate::cassette::{load_cassette, CassetteRecorder};
use crate::config::Config;
use crate::error::ImageError;
use crate::model::Provider;
use crate::ports::ImageGenerator;

/// Environment variable naming a cassette to replay.
pub const REPLAY_ENV: &str = "PIXPROMPT_REPLAY";
/// Environment variable enabling recording (`1` or `true`).
pub const RECORD_ENV: &str = "PIXPROMPT_REC";

/// Bundles the collaborator behind its port.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Arc<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the recorded cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = match Arc::try_unwrap(self.recorder) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(_) => return Err("Recording adapter still has references".to_string()),
        };
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Pick the mode from the environment: replay, record, or live.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded or the API key is missing.
    pub fn from_env(
        provider: Provider,
        config: &Config,
    ) -> Result<(Self, Option<RecordingSession>), ImageError> {
        if let Ok(cassette) = std::env::var(REPLAY_ENV) {
            tracing::info!(%cassette, "replaying from cassette");
            return Ok((Self::replaying(Path::new(&cassette))?, None));
        }
        let recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1");
        if recording {
            tracing::info!("recording mode enabled");
            let (ctx, session) = Self::recording(provider, config)?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(provider, config)?, None))
    }

    /// Create a live context for the given provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn live(provider: Provider, config: &Config) -> Result<Self, ImageError> {
        let generator = live_generator(provider, config)?;
        Ok(Self { generator: Arc::from(generator) })
    }

    /// Create a recording context that wraps a live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live adapter cannot be built.
    pub fn recording(
        provider: Provider,
        config: &Config,
    ) -> Result<(Self, RecordingSession), ImageError> {
        let live = live_generator(provider, config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".pixprompt/cassettes")
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_generator"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live, Arc::clone(&recorder));
        Ok((Self { generator: Arc::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = load_cassette(path)
            .map_err(|e| ImageError::Config(format!("Failed to load cassette: {e}")))?;
        Ok(Self { generator: Arc::new(ReplayingImageGenerator::new(replayer)) })
    }
}

fn live_generator(provider: Provider, config: &Config) -> Result<Box<dyn ImageGenerator>, ImageError> {
    let missing = |env_var: &str| ImageError::MissingApiKey {
        provider: provider.label().to_string(),
        env_var: env_var.to_string(),
    };
    let generator: Box<dyn ImageGenerator> = match provider {
        Provider::Imagen => {
            Box::new(ImagenGenerator::new(config.gemini_key().ok_or_else(|| missing("GEMINI_API_KEY"))?))
        }
        Provider::Gemini => {
            Box::new(GeminiGenerator::new(config.gemini_key().ok_or_else(|| missing("GEMINI_API_KEY"))?))
        }
        Provider::OpenAi => {
            Box::new(OpenAiGenerator::new(config.openai_key().ok_or_else(|| missing("OPENAI_API_KEY"))?))
        }
    };
    Ok(generator)
}

/// Current git commit hash, or "unknown" if unavailable.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
