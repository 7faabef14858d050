//! Target platform identity and default directories.
//!
//! The pipeline is told which platform it provisions for (CI matrix input);
//! host detection is only the fallback default.

pub use self::arch::Arch;
pub use self::dir::{default_model_dir, default_tool_cache_root};
pub use self::os::Os;

mod arch;
mod dir;
mod os;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("unknown operating system: {0}")]
    UnknownOs(String),

    #[error("unknown architecture: {0}")]
    UnknownArch(String),

    #[error("home directory could not be determined")]
    NoHomeDir,
}
