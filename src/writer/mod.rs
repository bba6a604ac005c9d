//! Lock-aware file writes.
//!
//! A file whose first two lines contain [`LOCK_MARKER`] has been claimed by
//! the user and is never overwritten unless the caller forces it. Writes go
//! through a temporary file in the destination directory and are renamed
//! into place, so a crash never leaves a half-written artifact behind.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Marker that protects a file from regeneration
pub const LOCK_MARKER: &str = "@lock";

/// Number of leading lines inspected for the lock marker
const LOCK_SCAN_LINES: usize = 2;

pub const WRITER_BUFFER_SIZE: usize = 64 * 1024;

/// True if `path` exists and one of its first two lines carries the lock marker.
///
/// A missing file is not locked. Non-UTF-8 content is decoded lossily.
pub fn is_locked(path: &Path) -> std::io::Result<bool> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let reader = BufReader::new(file);
    for line in reader.split(b'\n').take(LOCK_SCAN_LINES) {
        let line = line?;
        if String::from_utf8_lossy(&line).contains(LOCK_MARKER) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Write `content` to `path` unless the existing file is locked.
///
/// Returns `Ok(true)` when the file was written and `Ok(false)` when it was
/// left alone because of the lock marker. `force` bypasses the lock check.
pub fn safe_write(path: &Path, content: &str, force: bool) -> std::io::Result<bool> {
    if !force && is_locked(path)? {
        warn!(path = %path.display(), "Skipping {} (locked with {})", path.display(), LOCK_MARKER);
        return Ok(false);
    }
    write_atomic(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(true)
}

/// Replace `path` with `content` via a sibling temporary file and a rename.
///
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::with_capacity(WRITER_BUFFER_SIZE, tmp.as_file());
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    // Generated files are mounted into containers that run as another user
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
