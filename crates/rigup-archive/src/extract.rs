use std::fs::File;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::format::ArchiveFormat;
use crate::{ArchiveError, Result};

/// Extract an archive into `dest`, creating it as needed.
///
/// Zip and tar.gz are unpacked natively; 7z and pkg expansion delegate to
/// the platform tools (`7z`, `pkgutil`) the way CI images provide them. On
/// any failure the destination directory is removed before the error
/// propagates, so a half-extracted tree never survives.
pub fn extract(archive: &Path, dest: &Path, format: ArchiveFormat) -> Result<()> {
    info!(archive = %archive.display(), dest = %dest.display(), ?format, "extracting archive");

    let outcome = match format {
        ArchiveFormat::Zip => extract_zip(archive, dest),
        ArchiveFormat::TarGz => extract_tar_gz(archive, dest),
        ArchiveFormat::SevenZ => run_tool(
            "7z",
            Command::new("7z")
                .arg("x")
                .arg(archive)
                .arg(format!("-o{}", dest.display()))
                .arg("-y"),
            archive,
        ),
        ArchiveFormat::Pkg => extract_pkg(archive, dest),
    };

    if outcome.is_err() {
        let _ = std::fs::remove_dir_all(dest);
    }
    outcome
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|_| ArchiveError::Corrupted {
        path: archive.to_path_buf(),
    })?;
    zip.extract(dest).map_err(|_| ArchiveError::Corrupted {
        path: archive.to_path_buf(),
    })
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = open(archive)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut tar = tar::Archive::new(decoder);
    tar.unpack(dest).map_err(|_| ArchiveError::Corrupted {
        path: archive.to_path_buf(),
    })
}

fn extract_pkg(archive: &Path, dest: &Path) -> Result<()> {
    // pkgutil refuses to expand into an existing directory.
    if dest.exists() {
        std::fs::remove_dir_all(dest).map_err(|source| ArchiveError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    run_tool(
        "pkgutil",
        Command::new("pkgutil").arg("--expand").arg(archive).arg(dest),
        archive,
    )
}

fn run_tool(tool: &'static str, command: &mut Command, archive: &Path) -> Result<()> {
    debug!(tool, archive = %archive.display(), "running extraction tool");
    let output = command.output().map_err(|source| ArchiveError::Io {
        path: archive.to_path_buf(),
        source,
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ArchiveError::Tool {
            tool,
            path: archive.to_path_buf(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
