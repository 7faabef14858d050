use clap::{Args, Parser, Subcommand};

/// Acquire, verify, and cache the inference tool and model a CI step needs.
#[derive(Parser)]
#[command(name = "rigup", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: tool install, then model acquisition.
    Run,
    /// Install the tool only.
    Install,
    /// Acquire the model only.
    Model,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Tool to install.
    #[arg(long, default_value = "ollama")]
    pub tool: String,

    /// Requested tool version: `latest`, an exact version, or a range.
    #[arg(long, default_value = "latest")]
    pub tool_version: String,

    /// Target operating system (defaults to the host).
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (defaults to the host).
    #[arg(long)]
    pub arch: Option<String>,

    /// Release catalog owner/repository.
    #[arg(long, default_value = "ollama/ollama")]
    pub repo: String,

    /// API token for the release catalog.
    #[arg(long)]
    pub token: Option<String>,

    /// Model repository identifier (`owner/name`).
    #[arg(long)]
    pub model: Option<String>,

    /// Quantization method selecting one model file among siblings.
    #[arg(long, default_value = "Q4_K_M")]
    pub quant: String,

    /// Model repository endpoint.
    #[arg(long, default_value = "https://huggingface.co")]
    pub endpoint: String,

    /// Directory for fetched model files.
    #[arg(long)]
    pub model_dir: Option<std::path::PathBuf>,

    /// Root of the local tool cache.
    #[arg(long)]
    pub tool_cache: Option<std::path::PathBuf>,

    /// Remote cache volume for model artifacts; omitting it disables the
    /// remote cache.
    #[arg(long)]
    pub remote_cache: Option<std::path::PathBuf>,

    /// Content-addressed cache key prefix.
    #[arg(long, default_value = "rigup-model")]
    pub cache_prefix: String,
}
