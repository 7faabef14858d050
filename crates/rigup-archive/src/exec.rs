use std::path::Path;

use crate::Result;

/// Set the owner-execute bit on a binary if it is missing. Idempotent.
///
/// Archives built on Windows routinely drop permission bits, so a freshly
/// extracted tool may not be runnable until this normalizes it.
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    use tracing::debug;

    use crate::ArchiveError;

    let io_err = |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    let mode = metadata.permissions().mode();
    debug!("{} {}", mode_string(mode), path.display());

    if mode & 0o100 == 0 {
        let new_mode = mode | 0o100;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(new_mode))
            .map_err(io_err)?;
        debug!("{} {}", mode_string(new_mode), path.display());
    }

    Ok(())
}

#[cfg(not(unix))]
pub fn ensure_executable(_path: &Path) -> Result<()> { Ok(()) }

/// Render a unix mode as `rwxr-xr-x` for debug logs.
#[cfg(unix)]
fn mode_string(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}
