//! Error types for collaborator calls and generation attempts.

use thiserror::Error;

/// Errors raised by the image-generation collaborator and its plumbing.
#[derive(Debug, Error)]
pub enum ImageError {
    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured for the provider.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },

    /// The service failed with a plain message (replayed errors, exhausted cassettes).
    #[error("{0}")]
    Service(String),
}

/// Terminal outcome of a failed generation attempt.
///
/// The `Display` text is exactly what the result region shows.
#[derive(Debug, Error)]
pub enum FormError {
    /// The prompt was empty or whitespace; the collaborator was not called.
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    /// The collaborator answered but produced no image.
    #[error("No image was generated. Please try a different prompt.")]
    EmptyResult,

    /// The collaborator call failed.
    #[error("An error occurred: {0}")]
    Collaborator(#[from] ImageError),

    /// Another attempt is still pending.
    #[error("A generation is already in progress.")]
    InFlight,
}

/// Anything that ends a CLI run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Setup or collaborator plumbing failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The generation attempt failed.
    #[error(transparent)]
    Form(#[from] FormError),
}
