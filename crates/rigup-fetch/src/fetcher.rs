use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use rigup_verify::{HashAlgorithm, constant_time_eq};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::client::HttpClient;
use crate::manifest::ChecksumManifest;
use crate::{FetchError, Result};

/// Download progress, reported at most once per throttle interval.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub bytes_downloaded: u64,
    pub total_bytes:      Option<u64>,
}

type ProgressFn = Box<dyn Fn(&Progress) + Send + Sync>;

/// Downloader configuration.
pub struct FetchOptions {
    pub on_progress:       Option<ProgressFn>,
    /// Minimum delay between progress reports; bounds log volume on slow and
    /// fast links alike.
    pub progress_interval: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            on_progress:       None,
            progress_interval: Duration::from_secs(1),
        }
    }
}

impl FetchOptions {
    pub fn on_progress(mut self, f: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

/// Streaming downloader with inline hashing and checksum verification.
///
/// Bytes are hashed as they stream to a staging file, so verification never
/// re-reads the artifact, and the destination name only ever holds verified
/// content.
pub struct Fetcher<C: HttpClient> {
    client:  C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Download a release asset and its checksum manifest concurrently,
    /// verify the asset against the manifest entry, and place the verified
    /// file at `dest_dir/<asset_name>`.
    ///
    /// The digest family is taken from the checksum asset's filename, never
    /// hardcoded. A hash mismatch deletes the staged download and is never
    /// retried here: a genuine integrity failure would not be fixed by a
    /// second attempt and could mask a compromised source.
    pub async fn fetch_and_verify(
        &self,
        asset_name: &str,
        asset_url: &str,
        checksum_name: &str,
        checksum_url: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let algo = HashAlgorithm::from_file_name(checksum_name)?;
        let staging = staging_path(dest_dir, asset_name);

        info!(asset = asset_name, %algo, "downloading asset and checksum manifest");
        let joined = tokio::try_join!(
            self.download_to(asset_url, &staging, algo),
            self.fetch_text(checksum_url),
        );
        let (computed, manifest_text) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                discard(&staging).await;
                return Err(e);
            }
        };

        let manifest = ChecksumManifest::parse(&manifest_text);
        let Some(expected) = manifest.entry_for(asset_name) else {
            discard(&staging).await;
            return Err(FetchError::ManifestEntryMissing {
                asset: asset_name.to_string(),
            });
        };

        if !constant_time_eq(&computed, expected) {
            let expected = expected.to_string();
            discard(&staging).await;
            return Err(FetchError::HashMismatch {
                asset: asset_name.to_string(),
                expected,
                computed,
            });
        }

        let destination = dest_dir.join(asset_name);
        tokio::fs::rename(&staging, &destination)
            .await
            .map_err(|source| FetchError::Io {
                path: destination.clone(),
                source,
            })?;

        info!(asset = asset_name, path = %destination.display(), "asset verified");
        Ok(destination)
    }

    /// Stream a URL into `destination`, hashing in the same pass. Returns the
    /// hex digest of everything written. Any failure removes the partial file
    /// before the error propagates.
    pub async fn download_to(
        &self,
        url: &str,
        destination: &Path,
        algo: HashAlgorithm,
    ) -> Result<String> {
        match self.stream_to_file(url, destination, algo).await {
            Ok(digest) => Ok(digest),
            Err(e) => {
                discard(destination).await;
                Err(e)
            }
        }
    }

    /// Fetch a small text body (manifest, JSON document).
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        self.client
            .get_text(url)
            .await
            .map_err(|e| FetchError::Download(e.to_string()))
    }

    async fn stream_to_file(
        &self,
        url: &str,
        destination: &Path,
        algo: HashAlgorithm,
    ) -> Result<String> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FetchError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let body = self
            .client
            .stream(url)
            .await
            .map_err(|e| FetchError::Download(e.to_string()))?;
        let total_bytes = body.total_bytes;
        let mut chunks = body.chunks;

        let mut file =
            tokio::fs::File::create(destination)
                .await
                .map_err(|source| FetchError::Io {
                    path: destination.to_path_buf(),
                    source,
                })?;

        let mut hasher = algo.hasher();
        let mut bytes_downloaded = 0u64;
        let mut last_report = Instant::now();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| FetchError::Download(e.to_string()))?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|source| FetchError::Io {
                    path: destination.to_path_buf(),
                    source,
                })?;
            bytes_downloaded += chunk.len() as u64;

            if last_report.elapsed() >= self.options.progress_interval {
                self.report(Progress {
                    bytes_downloaded,
                    total_bytes,
                });
                last_report = Instant::now();
            }
        }

        file.flush().await.map_err(|source| FetchError::Io {
            path: destination.to_path_buf(),
            source,
        })?;

        self.report(Progress {
            bytes_downloaded,
            total_bytes,
        });
        Ok(hex::encode(hasher.finalize()))
    }

    fn report(&self, progress: Progress) {
        if let Some(callback) = &self.options.on_progress {
            callback(&progress);
        }
    }
}

fn staging_path(dest_dir: &Path, asset_name: &str) -> PathBuf {
    dest_dir.join(format!(".{asset_name}.partial"))
}

/// Best-effort removal of a staged partial; a leftover partial must never be
/// mistaken for a complete artifact.
async fn discard(path: &Path) {
    if tokio::fs::remove_file(path).await.is_err() && path.exists() {
        warn!(path = %path.display(), "failed to remove partial download");
    }
}
