use std::path::PathBuf;

use rigup_verify::HashAlgorithm;

use crate::Result;

/// Derive a content-addressed cache key: `{prefix}-{digest}` where the
/// digest hashes the whole file set (per-file digests concatenated in
/// path-sorted order, then re-hashed).
///
/// Identical content under the same prefix always yields the identical key;
/// any byte change in any file changes it. The prefix keeps keys from
/// unrelated pipelines apart and doubles as the fallback-lookup prefix.
pub fn cache_key(prefix: &str, paths: &[PathBuf]) -> Result<String> {
    let digest = rigup_verify::hash_files(paths, HashAlgorithm::Sha256)?;
    Ok(format!("{prefix}-{digest}"))
}

/// Scope a key prefix to one (model, quantization) identity, lowercased with
/// path separators flattened. Keys for different models never share a
/// fallback prefix, so a prefix lookup can only ever hit the requested
/// model's own entries.
pub fn scoped_prefix(prefix: &str, model_id: &str, quant: &str) -> String {
    format!(
        "{prefix}-{}-{}",
        model_id.replace('/', "-").to_lowercase(),
        quant.to_lowercase()
    )
}
