//! Verified HTTP downloading with streaming hashing and atomic placement.
//!
//! The downloader streams bytes to a staging file while hashing them in the
//! same pass, so verification never re-reads the artifact. A download only
//! reaches its destination name after its digest matched the checksum
//! manifest; every failure path discards the staged partial first.
//!
//! The HTTP transport sits behind the [`HttpClient`] trait so tests can run
//! the whole pipeline against in-memory bytes.

pub use self::client::{BoxStream, ByteStream, HttpClient, ReqwestClient};
pub use self::fetcher::{FetchOptions, Fetcher, Progress};
pub use self::manifest::ChecksumManifest;

mod client;
mod fetcher;
mod manifest;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Verify(#[from] rigup_verify::VerifyError),

    #[error("checksum manifest has no entry for {asset}")]
    ManifestEntryMissing { asset: String },

    #[error("hash mismatch for {asset}: expected {expected}, computed {computed}")]
    HashMismatch {
        asset:    String,
        expected: String,
        computed: String,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;
