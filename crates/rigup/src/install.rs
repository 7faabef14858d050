//! Tool install flow.
//!
//! `Unchecked → Cached` on a local cache hit, otherwise
//! `Resolving → Downloading → Verifying → Extracting → Cached`; any middle
//! state may end `Failed`. There is no retry across states; a caller that
//! wants one re-invokes the whole flow.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rigup_archive::ArchiveFormat;
use rigup_fetch::{FetchOptions, Fetcher, HttpClient, ReqwestClient};
use rigup_release::{ReleaseCatalog, ReleaseSource};
use rigup_store::ToolCache;
use rigup_version::normalize_tag;
use semver::Version;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Resolving,
    Downloading,
    Verifying,
    Extracting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolving => write!(f, "resolving"),
            Stage::Downloading => write!(f, "downloading"),
            Stage::Verifying => write!(f, "verifying"),
            Stage::Extracting => write!(f, "extracting"),
        }
    }
}

pub struct InstalledTool {
    pub version:   Version,
    pub path:      PathBuf,
    pub cache_hit: bool,
}

/// Install the configured tool with the production catalog and transport.
pub async fn install_tool(config: &Config) -> Result<InstalledTool> {
    let catalog = ReleaseCatalog::new(&config.owner, &config.repo, config.token.clone());
    let fetcher = Fetcher::new(ReqwestClient::new()).with_options(
        FetchOptions::default().on_progress(|p| {
            info!(bytes = p.bytes_downloaded, total = ?p.total_bytes, "downloading");
        }),
    );
    install_with(config, &catalog, &fetcher).await
}

/// Install via the given catalog and transport, consulting the local tool
/// cache first. A satisfied lookup returns before either is touched and
/// yields the same path as the run that populated it; repeat runs make zero
/// network requests.
pub async fn install_with<S, C>(
    config: &Config,
    catalog: &S,
    fetcher: &Fetcher<C>,
) -> Result<InstalledTool>
where
    S: ReleaseSource,
    C: HttpClient,
{
    let cache = ToolCache::new(&config.tool_cache);

    if let Some((version, path)) =
        cache.lookup(&config.tool, &config.tool_version, config.os, config.arch)
    {
        info!(tool = %config.tool, %version, path = %path.display(), "tool already cached");
        return Ok(InstalledTool {
            version,
            path,
            cache_hit: true,
        });
    }

    let stage_err = |stage: Stage| move || format!("install failed while {stage}");

    // Resolving
    let releases = catalog
        .list_releases()
        .await
        .with_context(stage_err(Stage::Resolving))?;
    let tags: Vec<&str> = releases.iter().map(|r| r.tag_name.as_str()).collect();
    let version = rigup_version::resolve(&config.tool_version, tags)
        .with_context(stage_err(Stage::Resolving))?;
    info!(requested = %config.tool_version, matched = %version, "version resolved");

    let release = releases
        .iter()
        .find(|r| normalize_tag(&r.tag_name).as_ref() == Some(&version))
        .ok_or_else(|| anyhow!("resolved version {version} vanished from the catalog"))?;

    let selection = rigup_release::select(release, config.os, config.arch)
        .with_context(stage_err(Stage::Resolving))?;
    info!(
        asset = %selection.asset.name,
        checksum = %selection.checksum.name,
        "assets selected"
    );

    // Downloading + Verifying happen in one pass inside the fetcher.
    let staging =
        tempfile::tempdir().with_context(stage_err(Stage::Downloading))?;
    let verified = fetcher
        .fetch_and_verify(
            &selection.asset.name,
            &selection.asset.browser_download_url,
            &selection.checksum.name,
            &selection.checksum.browser_download_url,
            staging.path(),
        )
        .await
        .with_context(stage_err(Stage::Verifying))?;

    // Extracting
    let exec_name = config.os.executable_name(&config.tool);
    let source = match ArchiveFormat::from_name(&selection.asset.name) {
        Some(format) => {
            let extracted = staging.path().join("extracted");
            rigup_archive::extract(&verified, &extracted, format)
                .with_context(stage_err(Stage::Extracting))?;
            rigup_archive::ensure_executable(&extracted.join(&exec_name))
                .with_context(stage_err(Stage::Extracting))?;
            extracted
        }
        None => {
            let renamed = staging.path().join(&exec_name);
            std::fs::rename(&verified, &renamed)
                .with_context(stage_err(Stage::Extracting))?;
            rigup_archive::ensure_executable(&renamed)
                .with_context(stage_err(Stage::Extracting))?;
            renamed
        }
    };

    // Cached
    let path = cache
        .register(&config.tool, &version, config.os, config.arch, &source)
        .context("install failed while registering in the tool cache")?;

    Ok(InstalledTool {
        version,
        path,
        cache_hit: false,
    })
}
