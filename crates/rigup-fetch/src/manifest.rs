//! Checksum manifest parsing.
//!
//! A manifest is UTF-8 text with one `<hex digest><whitespace><filename>`
//! entry per line. The digest family is not recorded in the body; it is
//! carried by the manifest asset's own filename.

/// Parsed filename → expected-digest mapping.
#[derive(Debug, Clone)]
pub struct ChecksumManifest {
    entries: Vec<(String, String)>,
}

impl ChecksumManifest {
    /// Parse manifest text. Blank and malformed lines are skipped; a missing
    /// entry is only diagnosed when a specific file is looked up.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let digest = parts.next()?;
                let file = parts.next()?;
                Some((digest.to_lowercase(), file.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Expected digest for an asset, matched by filename suffix so `*` and
    /// `./` prefixes in manifest entries still hit.
    pub fn entry_for(&self, asset_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, file)| file.ends_with(asset_name))
            .map(|(digest, _)| digest.as_str())
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
