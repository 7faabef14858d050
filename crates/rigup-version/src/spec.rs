use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::VersionError;

/// A requested version: the literal `latest`, an exact version, or a
/// semver range (`^1.2`, `~0.5.0`, `>=0.4, <0.6`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionSpec {
    Latest,
    Exact(Version),
    Range(VersionReq),
}

impl VersionSpec {
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionSpec::Latest => true,
            VersionSpec::Exact(v) => v == version,
            VersionSpec::Range(req) => req.matches(version),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(VersionSpec::Latest);
        }
        if let Ok(v) = Version::parse(trimmed) {
            return Ok(VersionSpec::Exact(v));
        }
        VersionReq::parse(trimmed)
            .map(VersionSpec::Range)
            .map_err(|_| VersionError::InvalidSpec(s.to_string()))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => write!(f, "latest"),
            VersionSpec::Exact(v) => write!(f, "{v}"),
            VersionSpec::Range(req) => write!(f, "{req}"),
        }
    }
}

impl TryFrom<String> for VersionSpec {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<VersionSpec> for String {
    fn from(spec: VersionSpec) -> String { spec.to_string() }
}
