//! Archive extraction and executable normalization for fetched tools.
//!
//! Dispatch is purely on filename extension; a file matching no known
//! format is a bare executable and skips extraction. A failed extraction
//! removes its half-written destination so nothing downstream can register
//! an incomplete tree.

pub use self::exec::ensure_executable;
pub use self::extract::extract;
pub use self::format::ArchiveFormat;

mod exec;
mod extract;
mod format;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive {path} is corrupt or has an unsupported layout")]
    Corrupted { path: PathBuf },

    #[error("{tool} failed to extract {path}: {detail}")]
    Tool {
        tool:   &'static str,
        path:   PathBuf,
        detail: String,
    },

    #[error("filesystem error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
