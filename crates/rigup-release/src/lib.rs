//! Release catalog access and platform asset selection.
//!
//! A release catalog is a paginated listing of tagged releases, each with a
//! set of downloadable assets. Selection of the per-platform executable asset
//! is table-driven: every supported (os, arch) pair maps to one name pattern,
//! and exactly one asset must match it. Ambiguity is a failure, not a guess.

pub use self::catalog::{ReleaseCatalog, ReleaseSource};
pub use self::select::{Selection, select};
pub use self::types::{Release, ReleaseAsset};

mod catalog;
mod select;
mod types;

use rigup_platform::{Arch, Os};

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("release catalog request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("release catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("release catalog returned malformed JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error(
        "no unique executable asset for {os}/{arch} in release {tag} ({matched} candidates matched)"
    )]
    AssetNotFound {
        tag:     String,
        os:      Os,
        arch:    Arch,
        matched: usize,
    },

    #[error("release {tag} has no checksum manifest asset")]
    ChecksumAssetNotFound { tag: String },
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
