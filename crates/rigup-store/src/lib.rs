//! Local versioned tool cache keyed by (tool, version, os, arch).
//!
//! Layout: `<root>/<tool>/<version>/<os>-<arch>/`, with a `.complete` marker
//! written after the artifact copy finishes. A slot without the marker is a
//! leftover from an interrupted run and counts as absent. Lookups resolve a
//! version specifier against the cached versions with the same semantics as
//! remote resolution and never touch the network. Entries are never deleted
//! here.

pub use self::cache::ToolCache;

mod cache;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("source artifact does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("filesystem error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
