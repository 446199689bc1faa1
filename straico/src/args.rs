use std::path::PathBuf;

use clap::{Parser, Subcommand};
use straico_client::ImageSize;

/// Straico API command-line client
#[derive(Debug, Parser)]
#[command(name = "straico", about = "Call the Straico API from the command line")]
pub struct Args {
    /// Path to a TOML configuration file; `STRAICO_*` variables are used when absent
    #[arg(short, long, env = "STRAICO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `straico_client=trace`)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available chat and image models
    Models,

    /// Create a prompt completion
    Complete {
        /// Model identifier; repeat for several models
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// Prompt text
        #[arg(long)]
        message: String,

        /// Uploaded file URL to use as context
        #[arg(long = "file-url")]
        file_urls: Vec<String>,

        /// `YouTube` URL to use as context
        #[arg(long = "youtube-url")]
        youtube_urls: Vec<String>,

        /// Image URL to use as context
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Upload a local file for use as context
    Upload {
        /// File to upload
        path: PathBuf,

        /// Name to upload the file under
        #[arg(long)]
        filename: Option<String>,
    },

    /// Generate images from a description
    Image {
        /// Image model identifier
        #[arg(short, long)]
        model: String,

        /// Description of the image
        #[arg(short, long)]
        description: String,

        /// Image aspect
        #[arg(long)]
        size: Option<ImageSize>,

        /// Number of variations
        #[arg(long)]
        variations: Option<u32>,
    },
}
