//! Whole-file and file-set digests.
//!
//! File-set hashing backs content-addressed cache keys: each file is hashed
//! on its own, the hex digests are concatenated in path-sorted order, and the
//! concatenation is hashed again. Identical content always yields the same
//! digest; any single-byte change anywhere changes it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Result, VerifyError};
use crate::hasher::HashAlgorithm;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Stream one file through the given digest family and return the hex digest.
pub fn hash_file(path: impl AsRef<Path>, algo: HashAlgorithm) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = algo.hasher();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|source| VerifyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash a set of files into one digest, insensitive to input order.
///
/// Entries that are not regular files are skipped rather than rejected, so a
/// glob expansion may hand this directories without special-casing them.
pub fn hash_files(paths: &[PathBuf], algo: HashAlgorithm) -> Result<String> {
    let mut sorted: Vec<&PathBuf> = paths.iter().collect();
    sorted.sort();

    let mut concatenated = String::new();
    for path in sorted {
        if !path.is_file() {
            continue;
        }
        concatenated.push_str(&hash_file(path, algo)?);
    }

    let mut hasher = algo.hasher();
    hasher.update(concatenated.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
