//! The prompt form: prompt text plus the status of the latest generation attempt.
//!
//! Status is a single [`RequestStatus`] value moved by [`reduce`], so an image
//! and an error can never be shown together and `Loading` always clears both.
//! Attempts are serialized by an in-flight token: a second call while one is
//! pending is rejected with [`FormError::InFlight`] and leaves state untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::error::FormError;
use crate::output::to_data_uri;
use crate::ports::{GeneratedImage, ImageGenerator, ImageRequest, ImageResponse};

/// Options sent with every attempt. The image count is always one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Resolved model identifier.
    pub model: String,
    /// Aspect ratio, e.g. `"1:1"`.
    pub aspect_ratio: String,
    /// Size tier, e.g. `"1K"`.
    pub size: String,
    /// Quality level.
    pub quality: String,
    /// Requested output format.
    pub format: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: crate::model::resolve_model(crate::model::DEFAULT_MODEL),
            aspect_ratio: "1:1".to_string(),
            size: "1K".to_string(),
            quality: "auto".to_string(),
            format: "png".to_string(),
        }
    }
}

impl GenerationOptions {
    fn request_for(&self, prompt: &str) -> ImageRequest {
        ImageRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            aspect_ratio: self.aspect_ratio.clone(),
            size: self.size.clone(),
            quality: self.quality.clone(),
            format: self.format.clone(),
            count: 1,
        }
    }
}

/// An image ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    /// The image as returned by the collaborator.
    pub image: GeneratedImage,
    /// `data:` URI rendering of [`image`](Self::image).
    pub url: String,
}

impl From<GeneratedImage> for DisplayImage {
    fn from(image: GeneratedImage) -> Self {
        let url = to_data_uri(&image.mime_type, &image.data);
        Self { image, url }
    }
}

/// Where the latest generation attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Nothing attempted yet, or a pending attempt was abandoned.
    #[default]
    Idle,
    /// Waiting on the collaborator.
    Loading,
    /// The first returned image.
    Succeeded(DisplayImage),
    /// User-facing failure message.
    Failed(String),
}

impl RequestStatus {
    /// Whether an attempt is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Display URI of the generated image, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Succeeded(image) => Some(&image.url),
            _ => None,
        }
    }

    /// Failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Inputs to [`reduce`].
#[derive(Debug)]
pub enum FormEvent {
    /// A valid prompt was submitted and the collaborator is being called.
    Started,
    /// The collaborator answered.
    Completed(ImageResponse),
    /// The attempt failed with this user-facing message.
    Failed(String),
    /// The pending attempt was dropped before it resolved.
    Abandoned,
}

/// Apply one event to the current status.
#[must_use]
pub fn reduce(status: RequestStatus, event: FormEvent) -> RequestStatus {
    match event {
        FormEvent::Started => RequestStatus::Loading,
        FormEvent::Completed(response) => match response.images.into_iter().next() {
            Some(first) => RequestStatus::Succeeded(first.into()),
            None => RequestStatus::Failed(FormError::EmptyResult.to_string()),
        },
        FormEvent::Failed(message) => RequestStatus::Failed(message),
        FormEvent::Abandoned if status.is_loading() => RequestStatus::Idle,
        FormEvent::Abandoned => status,
    }
}

/// Snapshot of the form for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current prompt text.
    pub prompt: String,
    /// Status of the latest attempt.
    pub status: RequestStatus,
}

/// Flat view of [`FormState`]: the four fields a page renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Current prompt text.
    pub prompt: String,
    /// Whether an attempt is pending.
    pub loading: bool,
    /// Data URI of the image, empty when there is none.
    pub image_url: String,
    /// Error message, empty when there is none.
    pub error: String,
}

impl FormState {
    /// Flatten into the four-field view.
    #[must_use]
    pub fn view(&self) -> FormView {
        FormView {
            prompt: self.prompt.clone(),
            loading: self.status.is_loading(),
            image_url: self.status.image_url().unwrap_or_default().to_string(),
            error: self.status.error().unwrap_or_default().to_string(),
        }
    }
}

/// Stateful prompt form shared between the UI and the generation flow.
///
/// Clones are handles to the same form.
#[derive(Debug, Default, Clone)]
pub struct PromptForm {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, event: FormEvent) {
        let mut state = self.lock();
        let status = std::mem::take(&mut state.status);
        state.status = reduce(status, event);
    }
}

/// Held for the duration of one attempt. Releases the form on drop and, if
/// the attempt never resolved, moves it out of `Loading`.
#[derive(Debug)]
struct InFlightToken {
    shared: Arc<Shared>,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.shared.apply(FormEvent::Abandoned);
        self.shared.in_flight.store(false, Ordering::Release);
    }
}

/// An accepted attempt: the prompt is non-blank and the form shows `Loading`.
///
/// Dropping it without calling [`run`](Self::run) returns the form to `Idle`.
#[derive(Debug)]
#[must_use = "an attempt does nothing until it is run"]
pub struct Attempt {
    token: InFlightToken,
    prompt: String,
}

impl PromptForm {
    /// Create an idle form with an empty prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn claim(&self) -> Result<InFlightToken, FormError> {
        self.shared
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| InFlightToken { shared: Arc::clone(&self.shared) })
            .map_err(|_| {
                tracing::warn!("generation rejected: another attempt is in flight");
                FormError::InFlight
            })
    }

    fn start(&self, token: InFlightToken) -> Result<Attempt, FormError> {
        let prompt = self.shared.lock().prompt.clone();
        if prompt.trim().is_empty() {
            self.shared.apply(FormEvent::Failed(FormError::EmptyPrompt.to_string()));
            return Err(FormError::EmptyPrompt);
        }
        self.shared.apply(FormEvent::Started);
        Ok(Attempt { token, prompt })
    }

    /// Replace the prompt text.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.shared.lock().prompt = prompt.into();
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.shared.lock().clone()
    }

    /// Replace the prompt and claim the form for a new attempt.
    ///
    /// The form is `Loading` as soon as this returns `Ok`. A rejected call
    /// leaves the pending attempt's prompt in place.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InFlight`] if another attempt is pending and
    /// [`FormError::EmptyPrompt`] for a blank prompt.
    pub fn begin(&self, prompt: impl Into<String>) -> Result<Attempt, FormError> {
        let token = self.claim()?;
        self.set_prompt(prompt);
        self.start(token)
    }

    /// Run one generation attempt for the current prompt.
    ///
    /// On success the first returned image becomes the displayed image. Every
    /// outcome other than [`FormError::InFlight`] is also reflected in the
    /// form's status, and `Loading` is cleared before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InFlight`] if another attempt is pending,
    /// [`FormError::EmptyPrompt`] for a blank prompt, [`FormError::EmptyResult`]
    /// when no image came back, and [`FormError::Collaborator`] when the call failed.
    pub async fn generate_image(
        &self,
        generator: &dyn ImageGenerator,
        options: &GenerationOptions,
    ) -> Result<DisplayImage, FormError> {
        let token = self.claim()?;
        self.start(token)?.run(generator, options).await
    }

    /// Replace the prompt and run an attempt, unless one is already pending.
    ///
    /// # Errors
    ///
    /// Same as [`generate_image`](Self::generate_image).
    pub async fn submit(
        &self,
        prompt: impl Into<String>,
        generator: &dyn ImageGenerator,
        options: &GenerationOptions,
    ) -> Result<DisplayImage, FormError> {
        self.begin(prompt)?.run(generator, options).await
    }
}

impl Attempt {
    /// Prompt this attempt was started with.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Call the collaborator and record the outcome on the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyResult`] when no image came back and
    /// [`FormError::Collaborator`] when the call failed.
    pub async fn run(
        self,
        generator: &dyn ImageGenerator,
        options: &GenerationOptions,
    ) -> Result<DisplayImage, FormError> {
        let shared = &self.token.shared;
        tracing::info!(model = %options.model, prompt = %self.prompt, "generating image");

        match generator.generate(&options.request_for(&self.prompt)).await {
            Ok(response) => {
                if response.images.len() > 1 {
                    tracing::debug!(count = response.images.len(), "keeping the first image only");
                }
                shared.apply(FormEvent::Completed(response));
                let shown = match &shared.lock().status {
                    RequestStatus::Succeeded(image) => Some(image.clone()),
                    _ => None,
                };
                match shown {
                    Some(image) => {
                        tracing::info!(bytes = image.image.data.len(), mime = %image.image.mime_type, "image generated");
                        Ok(image)
                    }
                    None => {
                        tracing::warn!("collaborator returned no images");
                        Err(FormError::EmptyResult)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "image generation failed");
                let error = FormError::Collaborator(e);
                shared.apply(FormEvent::Failed(error.to_string()));
                Err(error)
            }
        }
    }
}
