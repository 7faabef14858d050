//! Content verification primitives for downloaded artifacts.
//!
//! Provides incremental hashing, whole-file and file-set digests, and a
//! constant-time hex comparison. The digest family is chosen at runtime
//! (checksum manifests name their own algorithm), so nothing here hardcodes
//! one hash function.

pub use self::error::{Result, VerifyError};
pub use self::fileset::{hash_file, hash_files};
pub use self::hasher::{HashAlgorithm, Hasher, Sha256Hasher, Sha512Hasher};

mod error;
mod fileset;
mod hasher;

/// Compare two hex digests in constant time.
///
/// Length is checked first; equal-length inputs are always scanned in full so
/// the comparison cost does not depend on where the first difference sits.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
