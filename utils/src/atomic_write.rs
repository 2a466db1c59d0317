//! Crash-safe file replacement.
//!
//! Bytes go to a temp file in the destination directory which is then renamed
//! over the target. Where rename cannot replace an existing file, the old file
//! is parked at `<name>.bak` for the duration of the swap; [`recover_bak_file`]
//! puts it back if the process died inside that window.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// `fsync` the temp file before it replaces the target.
    pub sync: bool,
    /// Unix permission bits for the written file. `None` keeps the umask default.
    pub mode: Option<u32>,
    /// Create missing parent directories first.
    pub create_parents: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: true,
            mode: None,
            create_parents: true,
        }
    }
}

/// Sibling path used to park the previous file during a replace.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".bak");
    path.with_file_name(name)
}

/// Restore `path` from its backup when only the backup survived.
///
/// Returns `true` if a file was recovered.
pub fn recover_bak_file(path: &Path) -> bool {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return false;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Recovered file from interrupted write");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover backup: {e}");
            false
        }
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, WriteOptions::default())
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if options.create_parents {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }
    #[cfg(unix)]
    if let Some(mode) = options.mode {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = backup_path(path);
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove backup after write: {e}");
        }
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}
