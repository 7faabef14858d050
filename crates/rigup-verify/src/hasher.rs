use sha2::{Digest, Sha256, Sha512};

use crate::error::VerifyError;

/// Incremental hasher over a byte stream.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

pub struct Sha256Hasher(Sha256);

impl Sha256Hasher {
    pub fn new() -> Self { Self(Sha256::new()) }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

pub struct Sha512Hasher(Sha512);

impl Sha512Hasher {
    pub fn new() -> Self { Self(Sha512::new()) }
}

impl Default for Sha512Hasher {
    fn default() -> Self { Self::new() }
}

impl Hasher for Sha512Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

/// Digest family, named by checksum-manifest filenames (`sha256sum.txt`,
/// `sha512sums`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Extract the digest family from a filename that starts with a
    /// `sha<N>` token.
    pub fn from_file_name(name: &str) -> Result<Self, VerifyError> {
        let lower = name.to_lowercase();
        if lower.starts_with("sha256") {
            Ok(HashAlgorithm::Sha256)
        } else if lower.starts_with("sha512") {
            Ok(HashAlgorithm::Sha512)
        } else {
            Err(VerifyError::UnsupportedAlgorithm(name.to_string()))
        }
    }

    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
            HashAlgorithm::Sha512 => Box::new(Sha512Hasher::new()),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}
