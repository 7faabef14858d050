//! Remote cache backend seam.
//!
//! The backend stores opaque file sets under string keys and supports three
//! operations: an existence probe that moves no data, a restore with
//! prefix-based fallback, and a save. Cross-process races on `save` are the
//! backend's problem; the first writer wins.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another run saved this key first; not an error.
    AlreadyExists,
}

pub trait CacheBackend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lookup-only existence check for an exact key. Must not transfer or
    /// materialize any data.
    fn probe(&self, key: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Restore the file set for `key` into `dest_dir`. When the exact key is
    /// absent, fall back to the entry with the given key prefix (closest
    /// variant wins). Returns the key actually restored, if any.
    fn restore(
        &self,
        key: Option<&str>,
        fallback_prefix: &str,
        dest_dir: &Path,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Store the file set under `key`. Saving an existing key is reported,
    /// not performed.
    fn save(
        &self,
        paths: &[PathBuf],
        key: &str,
    ) -> impl Future<Output = Result<SaveOutcome, Self::Error>> + Send;
}

/// Cache backend over a shared directory (a mounted CI cache volume). One
/// subdirectory per key, files stored by name.
pub struct DirCacheBackend {
    root: PathBuf,
}

impl DirCacheBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn key_dir(&self, key: &str) -> PathBuf { self.root.join(key) }

    fn find_by_prefix(&self, prefix: &str) -> std::io::Result<Option<String>> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Ok(None);
        };
        let mut candidates: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .collect();
        candidates.sort();
        Ok(candidates.pop())
    }

    async fn materialize(&self, key: &str, dest_dir: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let mut entries = tokio::fs::read_dir(self.key_dir(key)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = dest_dir.join(entry.file_name());
            tokio::fs::copy(entry.path(), &target).await?;
        }
        Ok(())
    }
}

impl CacheBackend for DirCacheBackend {
    type Error = std::io::Error;

    async fn probe(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.key_dir(key).is_dir())
    }

    async fn restore(
        &self,
        key: Option<&str>,
        fallback_prefix: &str,
        dest_dir: &Path,
    ) -> Result<Option<String>, Self::Error> {
        let hit = match key {
            Some(k) if self.key_dir(k).is_dir() => Some(k.to_string()),
            _ => self.find_by_prefix(fallback_prefix)?,
        };

        match hit {
            Some(k) => {
                self.materialize(&k, dest_dir).await?;
                Ok(Some(k))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<SaveOutcome, Self::Error> {
        let key_dir = self.key_dir(key);
        if key_dir.is_dir() {
            return Ok(SaveOutcome::AlreadyExists);
        }

        // Stage under a temporary name so a concurrent reader never sees a
        // half-populated key.
        let staging = self.root.join(format!(".{key}.staging"));
        tokio::fs::create_dir_all(&staging).await?;
        for path in paths {
            if let Some(name) = path.file_name() {
                tokio::fs::copy(path, staging.join(name)).await?;
            }
        }

        match tokio::fs::rename(&staging, &key_dir).await {
            Ok(()) => Ok(SaveOutcome::Saved),
            Err(_) if key_dir.is_dir() => {
                // Lost the race; the first writer's entry stands.
                let _ = tokio::fs::remove_dir_all(&staging).await;
                Ok(SaveOutcome::AlreadyExists)
            }
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&staging).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_is_lookup_only() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DirCacheBackend::new(dir.path().join("cache"));

        assert!(!backend.probe("prefix-abc").await.unwrap());

        let artifact = dir.path().join("m.gguf");
        std::fs::write(&artifact, b"weights").unwrap();
        backend.save(&[artifact], "prefix-abc").await.unwrap();

        assert!(backend.probe("prefix-abc").await.unwrap());
        // The probe must not have created anything outside the cache root.
        assert!(!dir.path().join("m.gguf.restored").exists());
    }

    #[tokio::test]
    async fn restore_prefers_exact_then_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DirCacheBackend::new(dir.path().join("cache"));

        let artifact = dir.path().join("m.gguf");
        std::fs::write(&artifact, b"weights").unwrap();
        backend.save(&[artifact.clone()], "model-aaa").await.unwrap();
        backend.save(&[artifact], "model-bbb").await.unwrap();

        let dest = dir.path().join("restored");
        let hit = backend
            .restore(Some("model-aaa"), "model-", &dest)
            .await
            .unwrap();
        assert_eq!(hit.as_deref(), Some("model-aaa"));
        assert!(dest.join("m.gguf").is_file());

        let hit = backend
            .restore(Some("model-zzz"), "model-", &dest)
            .await
            .unwrap();
        assert_eq!(hit.as_deref(), Some("model-bbb"));
    }

    #[tokio::test]
    async fn duplicate_save_reports_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DirCacheBackend::new(dir.path().join("cache"));

        let artifact = dir.path().join("m.gguf");
        std::fs::write(&artifact, b"weights").unwrap();

        let first = backend.save(&[artifact.clone()], "k").await.unwrap();
        let second = backend.save(&[artifact], "k").await.unwrap();
        assert_eq!(first, SaveOutcome::Saved);
        assert_eq!(second, SaveOutcome::AlreadyExists);
    }
}
