use std::path::PathBuf;

use crate::PlatformError;

/// Default root for the local tool cache: `~/.rigup/tools`.
pub fn default_tool_cache_root() -> Result<PathBuf, PlatformError> {
    Ok(base_dir()?.join("tools"))
}

/// Default directory for fetched model artifacts: `~/.rigup/models`.
pub fn default_model_dir() -> Result<PathBuf, PlatformError> {
    Ok(base_dir()?.join("models"))
}

fn base_dir() -> Result<PathBuf, PlatformError> {
    home::home_dir()
        .map(|h| h.join(".rigup"))
        .ok_or(PlatformError::NoHomeDir)
}
