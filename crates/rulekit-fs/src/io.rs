//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, NormalizedPath, Result};

/// Mode applied to every installed file.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// What [`write_if_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// What [`symlink_atomic`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    Replaced,
    Unchanged,
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp sibling used for write-then-rename. Same directory keeps the rename
/// on one filesystem; pid plus counter keeps concurrent writers apart.
fn temp_sibling(native_path: &Path, tag: &str) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.{}.{}",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        tag
    );
    native_path.with_file_name(temp_name)
}

fn ensure_parent(native_path: &Path) -> Result<()> {
    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Remove `path` if it is a symlink. Returns whether anything was removed.
pub fn remove_symlink(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::symlink_metadata(&native_path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))?;
            debug!(path = %path, "removed stale symlink");
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(native_path, e)),
    }
}

/// Remove the file or symlink at `path` without following links. Returns
/// whether anything was removed; a directory is left alone.
pub fn remove_file(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::symlink_metadata(&native_path) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => {
            fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))?;
            debug!(path = %path, "removed");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(native_path, e)),
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a reader never observes a partially
/// written file, then applies [`DEFAULT_FILE_MODE`]. A symlink sitting at
/// `path` is removed first so the write never lands on its target.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    write_atomic_with_mode(path, content, DEFAULT_FILE_MODE)
}

/// [`write_atomic`] with an explicit final file mode (ignored off Unix).
pub fn write_atomic_with_mode(path: &NormalizedPath, content: &[u8], mode: u32) -> Result<()> {
    let native_path = path.to_native();
    ensure_parent(&native_path)?;
    remove_symlink(path)?;

    let temp_path = temp_sibling(&native_path, "tmp");
    if let Err(e) = write_temp(&temp_path, &native_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    set_mode(&native_path, mode)?;
    Ok(())
}

fn write_temp(temp_path: &Path, native_path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Atomically write `content` unless the file already holds exactly these bytes.
///
/// An unchanged file is not touched, so its modification time survives.
/// A symlink at `path` never counts as unchanged; it is replaced by a file.
pub fn write_if_changed(path: &NormalizedPath, content: &[u8]) -> Result<WriteOutcome> {
    let native_path = path.to_native();
    if !path.is_symlink() {
        match fs::read(&native_path) {
            Ok(existing) if existing == content => {
                debug!(path = %path, "content unchanged, skipping write");
                return Ok(WriteOutcome::Unchanged);
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(native_path, e)),
        }
    }
    write_atomic(path, content)?;
    Ok(WriteOutcome::Written)
}

/// Place a symlink at `dest` pointing to `src`.
///
/// - `dest` already links to `src`: no-op.
/// - `dest` links elsewhere: replaced.
/// - `dest` is a regular file or directory: refused with
///   [`Error::DestinationOccupied`]; real content is never overwritten.
///
/// The link is created under a temp name and renamed into place.
pub fn symlink_atomic(src: &Path, dest: &NormalizedPath) -> Result<LinkOutcome> {
    if !src.exists() {
        return Err(Error::SourceMissing {
            path: src.to_path_buf(),
        });
    }

    let native_dest = dest.to_native();
    ensure_parent(&native_dest)?;

    let replacing = match fs::symlink_metadata(&native_dest) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let current = fs::read_link(&native_dest).map_err(|e| Error::io(&native_dest, e))?;
            if current == src {
                return Ok(LinkOutcome::Unchanged);
            }
            true
        }
        Ok(_) => {
            return Err(Error::DestinationOccupied { path: native_dest });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(Error::io(native_dest, e)),
    };

    let temp_path = temp_sibling(&native_dest, "link");
    let _ = fs::remove_file(&temp_path);
    make_symlink(src, &temp_path).map_err(|e| Error::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, &native_dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(native_dest, e));
    }

    Ok(if replacing {
        LinkOutcome::Replaced
    } else {
        LinkOutcome::Created
    })
}

#[cfg(unix)]
fn make_symlink(src: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, link)
}

#[cfg(windows)]
fn make_symlink(src: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(src, link)
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
