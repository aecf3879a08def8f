//! Pixprompt - turn a text prompt into an image.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod form;
mod logging;
mod model;
mod output;
mod params;
mod ports;
mod server;
mod ui;

use std::process;
use std::sync::Arc;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{ImageError, RunError};
use crate::form::{GenerationOptions, PromptForm};
use crate::model::{detect_provider, resolve_model, Provider};
use crate::output::{resolve_output_path, save_image};
use crate::params::{validate_aspect_ratio, validate_format, validate_quality, validate_size};
use crate::server::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RunError> {
    cli.check_serve_flags().map_err(ImageError::InvalidArgument)?;
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ImageError::Config)?;

    let resolved = cli.resolve_options(&config.defaults);
    let model = resolve_model(&resolved.model);
    let provider = detect_provider(&model).map_err(ImageError::InvalidArgument)?;
    tracing::debug!(%model, alias = %resolved.model, provider = provider.label(), "resolved model");

    let options = GenerationOptions {
        model,
        aspect_ratio: resolved.aspect_ratio,
        size: resolved.size,
        quality: resolved.quality,
        format: resolved.format,
    };
    validate_options(&options, provider).map_err(ImageError::InvalidArgument)?;

    if cli.serve {
        let listen = cli.listen.clone().unwrap_or_else(|| config.server.listen.clone());
        return serve_ui(&listen, provider, &config, options).await;
    }

    let prompt = cli.resolve_prompt().map_err(ImageError::Io)?;
    let (ctx, recording) = ServiceContext::from_env(provider, &config)?;

    let form = PromptForm::new();
    let outcome = form.submit(prompt.as_str(), ctx.generator.as_ref(), &options).await;

    drop(ctx);
    finish_recording(recording);

    let image = outcome?;
    let output_path = resolve_output_path(cli.output.as_deref(), &prompt, &options.format);
    save_image(&image.image.data, &image.image.mime_type, &options.format, &output_path)?;
    eprintln!("Saved: {}", output_path.display());
    Ok(())
}

async fn serve_ui(
    listen: &str,
    provider: Provider,
    config: &Config,
    options: GenerationOptions,
) -> Result<(), RunError> {
    let (ctx, recording) = ServiceContext::from_env(provider, config)?;
    let state = Arc::new(AppState::new(ctx.generator, options));
    let served = server::serve(listen, state).await;
    finish_recording(recording);
    served?;
    Ok(())
}

fn validate_options(options: &GenerationOptions, provider: Provider) -> Result<(), String> {
    validate_aspect_ratio(&options.aspect_ratio, provider)?;
    validate_size(&options.size, provider)?;
    validate_quality(&options.quality)?;
    validate_format(&options.format)
}

fn finish_recording(session: Option<context::RecordingSession>) {
    let Some(session) = session else { return };
    match session.finish() {
        Ok(path) => eprintln!("Cassette saved: {}", path.display()),
        Err(e) => tracing::warn!("failed to save cassette: {e}"),
    }
}
