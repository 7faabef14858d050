use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

use crate::spec::VersionSpec;
use crate::{Result, VersionError};

static PARTIAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>\d+)(?:\.(?<minor>\d+))?(?:\.(?<patch>\d+))?(?<rest>[-+][0-9A-Za-z.-]+)?$")
        .unwrap()
});

/// Normalize a free-form release tag to a semver version.
///
/// Strips a leading `v`/`V` and coerces partial forms (`1`, `1.2`) by
/// zero-filling. Returns `None` for tags that cannot be normalized; those
/// are simply ineligible for resolution.
pub fn normalize_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(v) = Version::parse(stripped) {
        return Some(v);
    }

    let caps = PARTIAL_REGEX.captures(stripped)?;
    let major = caps.name("major")?.as_str();
    let minor = caps.name("minor").map_or("0", |m| m.as_str());
    let patch = caps.name("patch").map_or("0", |m| m.as_str());
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    Version::parse(&format!("{major}.{minor}.{patch}{rest}")).ok()
}

/// Resolve a specifier against a catalog of tags to the single highest
/// satisfying version.
///
/// Non-normalizable tags are dropped from the candidate pool. Failure to
/// match is surfaced as [`VersionError::NoMatch`]; no fallback version is
/// ever substituted.
pub fn resolve<'a, I>(spec: &VersionSpec, tags: I) -> Result<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidates: Vec<Version> = tags.into_iter().filter_map(normalize_tag).collect();
    let count = candidates.len();

    candidates
        .into_iter()
        .filter(|v| spec.matches(v))
        .max()
        .ok_or_else(|| VersionError::NoMatch {
            spec:       spec.to_string(),
            candidates: count,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_prefixed_and_partial_tags() {
        assert_eq!(normalize_tag("v0.5.2"), Some(Version::new(0, 5, 2)));
        assert_eq!(normalize_tag("1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(normalize_tag("v2"), Some(Version::new(2, 0, 0)));
        assert_eq!(normalize_tag("release-candidate"), None);
    }

    #[test]
    fn caret_range_picks_highest_satisfying() {
        let spec = "^1.2.0".parse::<VersionSpec>().unwrap();
        let resolved = resolve(&spec, ["0.9.0", "1.2.0", "1.3.5", "2.0.0"]).unwrap();
        assert_eq!(resolved, Version::new(1, 3, 5));
    }

    #[test]
    fn unsatisfiable_exact_is_no_match() {
        let spec = "9.9.9".parse::<VersionSpec>().unwrap();
        let err = resolve(&spec, ["0.9.0", "1.2.0"]).unwrap_err();
        assert!(matches!(err, VersionError::NoMatch { .. }));
    }

    #[test]
    fn latest_picks_highest_normalizable() {
        let resolved = resolve(
            &VersionSpec::Latest,
            ["v0.4.0", "v0.5.0", "v0.5.2", "nightly"],
        )
        .unwrap();
        assert_eq!(resolved, Version::new(0, 5, 2));
    }

    #[test]
    fn resolution_is_deterministic_across_input_order() {
        let spec = VersionSpec::Latest;
        let a = resolve(&spec, ["v0.5.2", "v0.4.0", "v0.5.0"]).unwrap();
        let b = resolve(&spec, ["v0.4.0", "v0.5.0", "v0.5.2"]).unwrap();
        assert_eq!(a, b);
    }
}
