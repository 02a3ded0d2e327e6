//! Active-profile link and backups
//!
//! The active profile is the `oh-my-opencode.json` symlink in the config
//! directory. Backups are timestamped siblings of the file they copy.

pub mod backup;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::ProfileError;
use crate::profile::{ensure_profile, profile_name_from_file, ACTIVE_FILE, PROFILE_PREFIX};

pub use backup::{
    backup_active, backup_profile, latest_profile_backup, list_profile_backups,
    restore_profile_from_backup,
};

fn active_path(dir: &Path) -> PathBuf {
    dir.join(ACTIVE_FILE)
}

/// Name of the profile the active link points to.
///
/// `None` when there is no link, the active file is a regular file, or the
/// link target is not an existing profile file.
pub fn active_profile(dir: &Path) -> Result<Option<String>, ProfileError> {
    let path = active_path(dir);
    let meta = match fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if !meta.file_type().is_symlink() {
        return Ok(None);
    }

    let target = fs::read_link(&path)?;
    let Some(base) = target.file_name().map(|b| b.to_string_lossy().into_owned()) else {
        return Ok(None);
    };
    let Some(name) = profile_name_from_file(&base).map(str::to_string) else {
        return Ok(None);
    };

    let full = if target.is_absolute() {
        target
    } else {
        dir.join(target)
    };
    match fs::metadata(&full) {
        Ok(meta) if meta.is_dir() => Ok(None),
        Ok(_) => Ok(Some(name)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Point the active link at profile `name`.
///
/// A regular active file is backed up before it is replaced.
pub fn apply_profile(dir: &Path, name: &str) -> Result<(), ProfileError> {
    ensure_profile(dir, name)?;
    let target = format!("{PROFILE_PREFIX}{name}");
    let path = active_path(dir);

    match fs::symlink_metadata(&path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
        Ok(meta) if meta.file_type().is_symlink() => fs::remove_file(&path)?,
        Ok(meta) if meta.is_file() => {
            let saved = backup_active(dir)?;
            tracing::info!("Backed up regular active config to {}", saved.display());
            fs::remove_file(&path)?;
        }
        Ok(_) => return Err(ProfileError::UnsupportedActiveFile(path)),
    }

    symlink(&target, &path)?;
    tracing::info!("Activated profile {}", name);
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
