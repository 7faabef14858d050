//! Table-driven selection of the executable and checksum-manifest assets.

use once_cell::sync::Lazy;
use regex::Regex;
use rigup_platform::{Arch, Os};

use crate::types::{Release, ReleaseAsset};
use crate::{ReleaseError, Result};

// Checksum manifests are named like `sha256sum.txt` / `SHA512SUMS`.
static CHECKSUM_ASSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^sha\d{3}sum").unwrap());

/// Name pattern one (os, arch) pair expects of its executable asset.
///
/// All tokens must appear in the lowercased name, the suffix (when set) must
/// terminate it, and none of the forbidden suffixes may. Matching is always
/// positive: an asset qualifies by carrying the right tokens, never by
/// lacking someone else's.
struct AssetPattern {
    contains: &'static [&'static str],
    suffix:   Option<&'static str>,
    excludes: &'static [&'static str],
}

impl AssetPattern {
    fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.contains.iter().all(|token| lower.contains(token))
            && self.suffix.is_none_or(|s| lower.ends_with(s))
            && !self.excludes.iter().any(|s| lower.ends_with(s))
    }
}

/// Packaging conventions per platform. Pairs absent from this table are
/// unsupported and select nothing.
fn pattern_for(os: Os, arch: Arch) -> Option<AssetPattern> {
    match (os, arch) {
        // macOS ships a universal installer package named after darwin;
        // the zip variant duplicates it and is excluded.
        (Os::Macos, Arch::X64 | Arch::Arm64) => Some(AssetPattern {
            contains: &["darwin"],
            suffix:   None,
            excludes: &[".zip"],
        }),
        (Os::Linux, Arch::X64) => Some(AssetPattern {
            contains: &["linux"],
            suffix:   Some("amd64"),
            excludes: &[],
        }),
        (Os::Linux, Arch::Arm64) => Some(AssetPattern {
            contains: &["linux"],
            suffix:   Some("arm64"),
            excludes: &[],
        }),
        (Os::Windows, Arch::X64) => Some(AssetPattern {
            contains: &["windows"],
            suffix:   Some("amd64.zip"),
            excludes: &[],
        }),
        _ => None,
    }
}

/// The unique executable asset and its checksum manifest for one platform.
#[derive(Debug, Clone)]
pub struct Selection {
    pub asset:    ReleaseAsset,
    pub checksum: ReleaseAsset,
}

/// Pick exactly one executable asset and one checksum-manifest asset.
///
/// Zero and multiple executable matches are the same failure; a missing
/// checksum manifest fails even when the executable matched, so integrity
/// verification can never be skipped by construction.
pub fn select(release: &Release, os: Os, arch: Arch) -> Result<Selection> {
    let matched: Vec<&ReleaseAsset> = pattern_for(os, arch)
        .map(|pattern| {
            release
                .assets
                .iter()
                .filter(|asset| pattern.matches(&asset.name))
                .collect()
        })
        .unwrap_or_default();

    let asset = match matched.as_slice() {
        [single] => (*single).clone(),
        _ => {
            return Err(ReleaseError::AssetNotFound {
                tag: release.tag_name.clone(),
                os,
                arch,
                matched: matched.len(),
            });
        }
    };

    let checksum = release
        .assets
        .iter()
        .find(|asset| CHECKSUM_ASSET_REGEX.is_match(&asset.name))
        .cloned()
        .ok_or_else(|| ReleaseError::ChecksumAssetNotFound {
            tag: release.tag_name.clone(),
        })?;

    Ok(Selection { asset, checksum })
}
