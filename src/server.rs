//! Local browser UI over the prompt form.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::error::{FormError, ImageError};
use crate::form::{FormView, GenerationOptions, PromptForm};
use crate::ports::ImageGenerator;
use crate::ui::render_page;

/// Everything a request handler needs.
pub struct AppState {
    /// The single form this server session drives.
    pub form: PromptForm,
    /// Collaborator used for every attempt.
    pub generator: Arc<dyn ImageGenerator>,
    /// Options sent with every attempt.
    pub options: GenerationOptions,
}

impl AppState {
    /// Fresh session state with an idle form.
    #[must_use]
    pub fn new(generator: Arc<dyn ImageGenerator>, options: GenerationOptions) -> Self {
        Self { form: PromptForm::new(), generator, options }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateInput {
    #[serde(default)]
    prompt: String,
}

/// Build the UI routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/state", get(current_state))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.form.snapshot()))
}

/// Accept a prompt and start generating in the background.
///
/// The attempt is claimed before responding, so the redirected `GET /`
/// already shows `Loading`. Overlapping submits get 409 with the current page.
async fn generate(State(state): State<Arc<AppState>>, Form(input): Form<GenerateInput>) -> Response {
    match state.form.begin(input.prompt) {
        Ok(attempt) => {
            tracing::debug!(prompt = attempt.prompt(), "attempt accepted");
            let task_state = Arc::clone(&state);
            tokio::spawn(async move {
                // The outcome is recorded on the form.
                let _ = attempt.run(task_state.generator.as_ref(), &task_state.options).await;
            });
            Redirect::to("/").into_response()
        }
        Err(FormError::InFlight) => {
            (StatusCode::CONFLICT, Html(render_page(&state.form.snapshot()))).into_response()
        }
        Err(_) => Redirect::to("/").into_response(),
    }
}

async fn current_state(State(state): State<Arc<AppState>>) -> Json<FormView> {
    Json(state.form.snapshot().view())
}

/// Bind `addr` and serve the UI until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), ImageError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            // Ctrl-C handler failing to install just means no graceful stop.
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
