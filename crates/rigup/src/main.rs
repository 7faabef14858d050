//! rigup: provision a CI step with a verified inference tool and model.

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::pipeline::Pipeline;

mod cli;
mod config;
mod install;
mod pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.into_config()?;

    match cli.command {
        Command::Run => Pipeline::new().run(&config).await,
        Command::Install => install::install_tool(&config).await.map(|_| ()),
        Command::Model => pipeline::fetch_model_artifact(&config).await.map(|_| ()),
    }
}
