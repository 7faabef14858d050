//! Release-tag normalization and version-range resolution.
//!
//! Remote catalogs publish free-form tags (`v0.5.2`, `0.5`, `release-x`).
//! Tags are normalized to semver before any comparison; tags that do not
//! normalize are ineligible for matching rather than errors. A requested
//! specifier is either the literal `latest`, an exact version, or a semver
//! range, and resolution always picks the highest satisfying version.

pub use self::resolve::{normalize_tag, resolve};
pub use self::spec::VersionSpec;

mod resolve;
mod spec;

use semver::Version;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("invalid version specifier: {0}")]
    InvalidSpec(String),

    #[error("no available version satisfies {spec} (out of {candidates} candidates)")]
    NoMatch { spec: String, candidates: usize },
}

pub type Result<T> = std::result::Result<T, VersionError>;

/// The single version picked for a request. Deterministic for a given
/// catalog and specifier.
pub type ResolvedVersion = Version;
