#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::{Args, Command};
use clap::Parser;
use straico_client::{ImageGenerationRequest, PromptCompletionRequest, StraicoClient};
use straico_config::StraicoConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    // Load configuration
    let config = match &args.config {
        Some(path) => StraicoConfig::load(path)?,
        None => StraicoConfig::from_env()?,
    };

    let client = StraicoClient::new(config.client_config())?;

    tracing::info!(base_url = %client.base_url(), "calling Straico API");

    let result = run(&client, args.command).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// Execute one subcommand against the API
async fn run(client: &StraicoClient, command: Command) -> anyhow::Result<serde_json::Value> {
    let result = match command {
        Command::Models => client.list_models().await?,
        Command::Complete {
            models,
            message,
            file_urls,
            youtube_urls,
            images,
        } => {
            let mut req = PromptCompletionRequest::new(models, message);
            if !file_urls.is_empty() {
                req = req.with_file_urls(file_urls);
            }
            if !youtube_urls.is_empty() {
                req = req.with_youtube_urls(youtube_urls);
            }
            if !images.is_empty() {
                req = req.with_images(images);
            }
            client.create_prompt_completion(&req).await?
        }
        Command::Upload { path, filename } => client.upload_file(&path, filename.as_deref()).await?,
        Command::Image {
            model,
            description,
            size,
            variations,
        } => {
            let req = ImageGenerationRequest {
                size,
                variations,
                ..ImageGenerationRequest::new(model, description)
            };
            client.create_image_generation(&req).await?
        }
    };

    Ok(result)
}

/// Install a stderr `tracing` subscriber so stdout stays pure JSON
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
