//! Model artifact acquisition with content-addressed remote caching.
//!
//! A model is described by a repository document listing sibling files; the
//! wanted file is the unique `.gguf` sibling carrying the requested
//! quantization token. Fetched artifacts are keyed by the hash of their
//! content and coordinated against a remote cache backend so repeated runs
//! skip the (large) repository transfer entirely. The backend is a black
//! box behind [`CacheBackend`]; its unavailability degrades to a direct
//! fetch, never a failure.

pub use self::backend::{CacheBackend, DirCacheBackend, SaveOutcome};
pub use self::cas::{cache_key, scoped_prefix};
pub use self::fetch::{ModelArtifact, restore_or_fetch};
pub use self::repo::{ModelRepoDoc, ModelSource, Sibling, download_url, repo_doc_url, select_sibling};

mod backend;
mod cas;
mod fetch;
mod repo;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Fetch(#[from] rigup_fetch::FetchError),

    #[error(transparent)]
    Verify(#[from] rigup_verify::VerifyError),

    #[error("model repository document is malformed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(
        "no unique .gguf sibling with quantization {quant} in {model_id} ({matched} candidates)"
    )]
    QuantNotFound {
        model_id: String,
        quant:    String,
        matched:  usize,
    },

    #[error("filesystem error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
