use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rigup_platform::{Arch, Os};
use rigup_version::VersionSpec;

use crate::cli::ConfigArgs;

/// Everything one pipeline invocation needs, resolved up front. Components
/// receive only the fields they use; nothing here is lazily computed or
/// shared mutably.
pub struct Config {
    pub tool:         String,
    pub tool_version: VersionSpec,
    pub os:           Os,
    pub arch:         Arch,
    pub owner:        String,
    pub repo:         String,
    pub token:        Option<String>,
    pub model:        Option<String>,
    pub quant:        String,
    pub endpoint:     String,
    pub model_dir:    PathBuf,
    pub tool_cache:   PathBuf,
    pub remote_cache: Option<PathBuf>,
    pub cache_prefix: String,
}

impl ConfigArgs {
    pub fn into_config(self) -> Result<Config> {
        let os = match self.os {
            Some(s) => s.parse()?,
            None => Os::host().ok_or_else(|| anyhow!("unsupported host operating system"))?,
        };
        let arch = match self.arch {
            Some(s) => s.parse()?,
            None => Arch::host().ok_or_else(|| anyhow!("unsupported host architecture"))?,
        };

        let tool_version: VersionSpec = self
            .tool_version
            .parse()
            .with_context(|| format!("invalid --tool-version {:?}", self.tool_version))?;

        let (owner, repo) = self
            .repo
            .split_once('/')
            .ok_or_else(|| anyhow!("--repo must be owner/repository, got {:?}", self.repo))?;

        let model_dir = match self.model_dir {
            Some(dir) => dir,
            None => rigup_platform::default_model_dir()?,
        };
        let tool_cache = match self.tool_cache {
            Some(dir) => dir,
            None => rigup_platform::default_tool_cache_root()?,
        };

        Ok(Config {
            tool: self.tool,
            tool_version,
            os,
            arch,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: self.token,
            model: self.model,
            quant: self.quant,
            endpoint: self.endpoint,
            model_dir,
            tool_cache,
            remote_cache: self.remote_cache,
            cache_prefix: self.cache_prefix,
        })
    }
}
