use std::fs;
use std::path::{Path, PathBuf};

use rigup_platform::{Arch, Os};
use rigup_version::VersionSpec;
use semver::Version;
use tracing::{debug, info};

use crate::{Result, StoreError};

const COMPLETE_MARKER: &str = ".complete";

/// On-disk tool cache.
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn slot(&self, tool: &str, version: &Version, os: Os, arch: Arch) -> PathBuf {
        self.root
            .join(tool)
            .join(version.to_string())
            .join(format!("{os}-{arch}"))
    }

    /// Resolve a version specifier against the locally cached versions and
    /// return the highest complete entry, if any. This is the fast path that
    /// must avoid any network call.
    pub fn lookup(
        &self,
        tool: &str,
        spec: &VersionSpec,
        os: Os,
        arch: Arch,
    ) -> Option<(Version, PathBuf)> {
        let tool_dir = self.root.join(tool);
        let entries = fs::read_dir(&tool_dir).ok()?;

        entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter_map(|name| Version::parse(&name).ok())
            .filter(|version| spec.matches(version))
            .filter(|version| {
                let slot = self.slot(tool, version, os, arch);
                slot.join(COMPLETE_MARKER).is_file()
            })
            .max()
            .map(|version| {
                let slot = self.slot(tool, &version, os, arch);
                debug!(tool, %version, %os, %arch, path = %slot.display(), "tool cache hit");
                (version, slot)
            })
    }

    /// Copy a verified artifact (file or directory tree) into its slot and
    /// mark it complete.
    ///
    /// Registering a tuple that is already complete is a no-op returning the
    /// existing path; the cached content is never silently replaced. A stale
    /// marker-less slot is cleared and re-populated.
    pub fn register(
        &self,
        tool: &str,
        version: &Version,
        os: Os,
        arch: Arch,
        source: &Path,
    ) -> Result<PathBuf> {
        if !source.exists() {
            return Err(StoreError::SourceNotFound(source.to_path_buf()));
        }

        let slot = self.slot(tool, version, os, arch);
        if slot.join(COMPLETE_MARKER).is_file() {
            info!(tool, %version, %os, %arch, "already cached, keeping existing entry");
            return Ok(slot);
        }

        if slot.exists() {
            debug!(path = %slot.display(), "clearing stale cache slot");
            fs::remove_dir_all(&slot).map_err(|source| StoreError::Io {
                path: slot.clone(),
                source,
            })?;
        }

        fs::create_dir_all(&slot).map_err(|e| StoreError::Io {
            path: slot.clone(),
            source: e,
        })?;

        if source.is_dir() {
            copy_dir_all(source, &slot)?;
        } else {
            let file_name = source.file_name().unwrap_or_default();
            let target = slot.join(file_name);
            fs::copy(source, &target).map_err(|e| StoreError::Io {
                path: target,
                source: e,
            })?;
        }

        // Marker last: its presence certifies the copy above finished.
        let marker = slot.join(COMPLETE_MARKER);
        fs::write(&marker, b"").map_err(|e| StoreError::Io {
            path: marker,
            source: e,
        })?;

        info!(tool, %version, %os, %arch, path = %slot.display(), "registered in tool cache");
        Ok(slot)
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    let io_err = |path: &Path, source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !dst.exists() {
        fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;
    }

    for entry in fs::read_dir(src).map_err(|e| io_err(src, e))? {
        let entry = entry.map_err(|e| io_err(src, e))?;
        let ty = entry.file_type().map_err(|e| io_err(&entry.path(), e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(|e| io_err(&dst_path, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(s: &str) -> Version { Version::parse(s).unwrap() }

    fn spec(s: &str) -> VersionSpec { s.parse().unwrap() }

    #[test]
    fn register_then_lookup_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));

        let binary = dir.path().join("ollama");
        std::fs::write(&binary, b"binary").unwrap();

        let slot = cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &binary)
            .unwrap();
        assert!(slot.join("ollama").is_file());

        let (v, path) = cache
            .lookup("ollama", &spec("0.5.2"), Os::Linux, Arch::X64)
            .unwrap();
        assert_eq!(v, version("0.5.2"));
        assert_eq!(path, slot);
    }

    #[test]
    fn lookup_resolves_ranges_to_highest() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));
        let binary = dir.path().join("ollama");
        std::fs::write(&binary, b"binary").unwrap();

        for v in ["0.4.0", "0.5.0", "0.5.2"] {
            cache
                .register("ollama", &version(v), Os::Linux, Arch::X64, &binary)
                .unwrap();
        }

        let (v, _) = cache
            .lookup("ollama", &spec("^0.5.0"), Os::Linux, Arch::X64)
            .unwrap();
        assert_eq!(v, version("0.5.2"));

        let (v, _) = cache
            .lookup("ollama", &spec("latest"), Os::Linux, Arch::X64)
            .unwrap();
        assert_eq!(v, version("0.5.2"));
    }

    #[test]
    fn platform_keys_are_disjoint() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));
        let binary = dir.path().join("ollama");
        std::fs::write(&binary, b"binary").unwrap();

        cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &binary)
            .unwrap();

        assert!(
            cache
                .lookup("ollama", &spec("0.5.2"), Os::Linux, Arch::Arm64)
                .is_none()
        );
    }

    #[test]
    fn incomplete_slot_is_invisible_and_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));

        // Simulate an interrupted copy: slot content but no marker.
        let slot = dir
            .path()
            .join("cache/ollama/0.5.2/linux-x64");
        std::fs::create_dir_all(&slot).unwrap();
        std::fs::write(slot.join("ollama"), b"partial").unwrap();

        assert!(
            cache
                .lookup("ollama", &spec("0.5.2"), Os::Linux, Arch::X64)
                .is_none()
        );

        let binary = dir.path().join("ollama");
        std::fs::write(&binary, b"complete").unwrap();
        let registered = cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &binary)
            .unwrap();

        assert_eq!(std::fs::read(registered.join("ollama")).unwrap(), b"complete");
    }

    #[test]
    fn second_registration_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));

        let first = dir.path().join("first");
        std::fs::write(&first, b"original").unwrap();
        let slot = cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &first)
            .unwrap();

        let second = dir.path().join("first"); // same name, new content
        std::fs::write(&second, b"replacement").unwrap();
        let again = cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &second)
            .unwrap();

        assert_eq!(slot, again);
        assert_eq!(std::fs::read(slot.join("first")).unwrap(), b"original");
    }

    #[test]
    fn registers_directory_trees() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(dir.path().join("cache"));

        let tree = dir.path().join("extracted");
        std::fs::create_dir_all(tree.join("lib")).unwrap();
        std::fs::write(tree.join("ollama"), b"binary").unwrap();
        std::fs::write(tree.join("lib/libggml.so"), b"lib").unwrap();

        let slot = cache
            .register("ollama", &version("0.5.2"), Os::Linux, Arch::X64, &tree)
            .unwrap();

        assert!(slot.join("ollama").is_file());
        assert!(slot.join("lib/libggml.so").is_file());
    }
}
