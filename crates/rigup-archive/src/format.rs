/// Archive container formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZ,
    /// macOS installer package (xar container).
    Pkg,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from a filename. `None` means the file is a bare
    /// executable and needs no extraction.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if lower.ends_with(".7z") {
            Some(ArchiveFormat::SevenZ)
        } else if lower.ends_with(".pkg") {
            Some(ArchiveFormat::Pkg)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extensions() {
        assert_eq!(
            ArchiveFormat::from_name("ollama-windows-amd64.zip"),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            ArchiveFormat::from_name("bundle.tar.gz"),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(
            ArchiveFormat::from_name("bundle.TGZ"),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(
            ArchiveFormat::from_name("Ollama.pkg"),
            Some(ArchiveFormat::Pkg)
        );
        assert_eq!(
            ArchiveFormat::from_name("tool.7z"),
            Some(ArchiveFormat::SevenZ)
        );
    }

    #[test]
    fn bare_executables_are_none() {
        assert_eq!(ArchiveFormat::from_name("ollama-linux-amd64"), None);
        assert_eq!(ArchiveFormat::from_name("ollama-darwin"), None);
        // .gz alone is not a recognized container
        assert_eq!(ArchiveFormat::from_name("notes.gz"), None);
    }
}
