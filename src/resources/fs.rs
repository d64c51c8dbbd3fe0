//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Timestamp appended to backup file names.
const BACKUP_SUFFIX_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Write `content` to `path` through a temporary file in the same directory
/// that is renamed into place, so readers never see a partial file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or
/// if the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("writing temporary file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temporary file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming temporary file to {}", path.display()))?;
    Ok(())
}

/// Path of the backup copy of `path` taken at `now`:
/// `<name>.<YYYYmmddTHHMMSS>` in the same directory.
#[must_use]
pub fn backup_path<Tz>(path: &Path, now: &chrono::DateTime<Tz>) -> PathBuf
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(now.format(BACKUP_SUFFIX_FORMAT).to_string());
    path.with_file_name(name)
}

/// Copy `path` to a timestamped backup next to it.
///
/// Returns the backup path, or `None` when there is nothing to back up.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be copied.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = backup_path(path, &chrono::Local::now());
    std::fs::copy(path, &backup)
        .with_context(|| format!("backing up {} to {}", path.display(), backup.display()))?;
    Ok(Some(backup))
}
