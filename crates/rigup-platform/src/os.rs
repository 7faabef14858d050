use std::fmt;
use std::str::FromStr;

use crate::PlatformError;

/// Operating system targets the pipeline can provision for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Windows,
    Macos,
}

impl Os {
    pub const ALL: [Os; 3] = [Os::Linux, Os::Windows, Os::Macos];

    /// Host operating system, used when no target is configured.
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Os::Linux),
            "windows" => Some(Os::Windows),
            "macos" => Some(Os::Macos),
            _ => None,
        }
    }

    /// Name of the installed tool executable on this OS.
    pub fn executable_name(self, tool: &str) -> String {
        match self {
            Os::Windows => format!("{tool}.exe"),
            _ => tool.to_string(),
        }
    }
}

impl FromStr for Os {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "windows" => Ok(Os::Windows),
            "macos" | "darwin" => Ok(Os::Macos),
            other => Err(PlatformError::UnknownOs(other.to_string())),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::Windows => write!(f, "windows"),
            Os::Macos => write!(f, "macos"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert!("beos".parse::<Os>().is_err());
    }

    #[test]
    fn executable_name_is_os_specific() {
        assert_eq!(Os::Windows.executable_name("ollama"), "ollama.exe");
        assert_eq!(Os::Linux.executable_name("ollama"), "ollama");
    }
}
