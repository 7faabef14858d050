//! Stage orchestration.
//!
//! One pipeline invocation runs Pre → Main → Post exactly once, tracked by
//! an in-process run record rather than a process-environment flag. Fatal
//! errors abort with the failing stage named; an unavailable remote cache
//! only degrades the model path.

use anyhow::{Context, Result};
use rigup_fetch::{FetchOptions, Fetcher, ReqwestClient};
use rigup_model::{DirCacheBackend, ModelArtifact};
use tracing::info;

use crate::config::Config;
use crate::install;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageState {
    Pending,
    Done,
}

/// Run record: each stage flips to `Done` at most once per invocation.
pub struct Pipeline {
    pre:  StageState,
    main: StageState,
    post: StageState,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            pre:  StageState::Pending,
            main: StageState::Pending,
            post: StageState::Pending,
        }
    }

    pub async fn run(mut self, config: &Config) -> Result<()> {
        self.pre(config).await.context("pre stage failed")?;
        self.main(config).await.context("main stage failed")?;
        self.post(config).await.context("post stage failed")?;
        Ok(())
    }

    /// Pre: install the tool and prepare the model directory.
    async fn pre(&mut self, config: &Config) -> Result<()> {
        if self.pre == StageState::Done {
            return Ok(());
        }

        let installed = install::install_tool(config).await?;
        info!(
            tool = %config.tool,
            version = %installed.version,
            path = %installed.path.display(),
            cache_hit = installed.cache_hit,
            "tool ready"
        );

        std::fs::create_dir_all(&config.model_dir).with_context(|| {
            format!("failed to create model directory {}", config.model_dir.display())
        })?;

        self.pre = StageState::Done;
        Ok(())
    }

    /// Main: acquire the model, remote cache first.
    async fn main(&mut self, config: &Config) -> Result<()> {
        if self.main == StageState::Done {
            return Ok(());
        }

        if config.model.is_some() {
            let artifact = fetch_model_artifact(config).await?;
            match &artifact.restored_from {
                Some(key) => info!(%key, path = %artifact.path.display(), "model ready (cache)"),
                None => info!(path = %artifact.path.display(), "model ready (fetched)"),
            }
        } else {
            info!("no model requested, skipping acquisition");
        }

        self.main = StageState::Done;
        Ok(())
    }

    /// Post: teardown hook. Service management is out of scope; the cached
    /// tool and model stay on disk for the next run.
    async fn post(&mut self, _config: &Config) -> Result<()> {
        if self.post == StageState::Done {
            return Ok(());
        }
        info!("pipeline complete");
        self.post = StageState::Done;
        Ok(())
    }
}

/// Acquire the configured model via the remote cache, falling back to the
/// repository fetch.
pub async fn fetch_model_artifact(config: &Config) -> Result<ModelArtifact> {
    let model = config
        .model
        .as_deref()
        .context("no --model configured")?;

    std::fs::create_dir_all(&config.model_dir).with_context(|| {
        format!("failed to create model directory {}", config.model_dir.display())
    })?;

    let backend = config.remote_cache.as_deref().map(DirCacheBackend::new);
    if backend.is_none() {
        info!("remote cache not configured, model will be fetched directly");
    }

    let fetcher = Fetcher::new(ReqwestClient::new()).with_options(
        FetchOptions::default().on_progress(|p| {
            info!(bytes = p.bytes_downloaded, total = ?p.total_bytes, "downloading model");
        }),
    );

    rigup_model::restore_or_fetch(
        &fetcher,
        backend.as_ref(),
        &config.endpoint,
        model,
        &config.quant,
        &config.model_dir,
        &config.cache_prefix,
    )
    .await
    .map_err(Into::into)
}
