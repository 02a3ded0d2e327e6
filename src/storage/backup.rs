//! Timestamped backups and restore

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{fsutil, ProfileError};
use crate::profile::{ensure_profile, ACTIVE_FILE, BACKUP_MARKER, PROFILE_PREFIX};

fn backup_target(dir: &Path, file_name: &str) -> PathBuf {
    let base = dir.join(format!("{file_name}{BACKUP_MARKER}{}", fsutil::timestamp()));
    fsutil::unique_path(base)
}

/// Copy the active config file to a new backup
pub fn backup_active(dir: &Path) -> Result<PathBuf, ProfileError> {
    let dst = backup_target(dir, ACTIVE_FILE);
    fsutil::copy_atomic(&dir.join(ACTIVE_FILE), &dst)?;
    Ok(dst)
}

/// Copy profile `name` to a new backup and return its path
pub fn backup_profile(dir: &Path, name: &str) -> Result<PathBuf, ProfileError> {
    let src = ensure_profile(dir, name)?;
    let dst = backup_target(dir, &format!("{PROFILE_PREFIX}{name}"));
    fsutil::copy_atomic(&src, &dst)?;
    tracing::info!("Backed up profile {} to {}", name, dst.display());
    Ok(dst)
}

fn backup_prefix(name: &str) -> String {
    format!("{PROFILE_PREFIX}{name}{BACKUP_MARKER}")
}

/// Backup file names of profile `name`, newest first
pub fn list_profile_backups(dir: &Path, name: &str) -> Result<Vec<String>, ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::NameRequired);
    }
    let prefix = backup_prefix(name);
    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.len() > prefix.len() && file_name.starts_with(&prefix) {
            backups.push(file_name);
        }
    }
    backups.sort_by(|a, b| b.cmp(a));
    Ok(backups)
}

/// Newest backup file name of profile `name`
pub fn latest_profile_backup(dir: &Path, name: &str) -> Result<Option<String>, ProfileError> {
    Ok(list_profile_backups(dir, name)?.into_iter().next())
}

fn resolve_backup_path(dir: &Path, from: &str) -> Result<PathBuf, ProfileError> {
    let direct = PathBuf::from(from);
    if direct.exists() {
        return Ok(direct);
    }
    let candidate = dir.join(from);
    fs::metadata(&candidate)?;
    Ok(candidate)
}

fn in_config_dir(path: &Path, dir: &Path) -> Result<bool, ProfileError> {
    let path = fs::canonicalize(path)?;
    let dir = fs::canonicalize(dir)?;
    Ok(path.parent() == Some(dir.as_path()))
}

/// Replace profile `name` with the content of backup `from`.
///
/// The current profile is backed up first; that pre-restore backup path is
/// returned.
pub fn restore_profile_from_backup(
    dir: &Path,
    name: &str,
    from: &str,
) -> Result<PathBuf, ProfileError> {
    let profile_path = ensure_profile(dir, name)?;
    if from.is_empty() {
        return Err(ProfileError::NameRequired);
    }
    let backup_path = resolve_backup_path(dir, from)?;
    if !in_config_dir(&backup_path, dir)? {
        return Err(ProfileError::BackupOutsideConfigDir(backup_path));
    }

    let base = backup_path
        .file_name()
        .map(|b| b.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = backup_prefix(name);
    if !(base.len() > prefix.len() && base.starts_with(&prefix)) {
        return Err(ProfileError::BackupMismatch {
            backup: base,
            profile: name.to_string(),
        });
    }

    let pre = backup_profile(dir, name)?;
    fsutil::copy_atomic(&backup_path, &profile_path)?;
    tracing::info!("Restored profile {} from {}", name, base);
    Ok(pre)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("oh-my-opencode.json.work"), "current").unwrap();
        tmp
    }

    #[test]
    fn test_backup_profile_copies_content() {
        let tmp = setup();
        let path = backup_profile(tmp.path(), "work").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "current");
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("oh-my-opencode.json.work.bak."));
    }

    #[test]
    fn test_list_backups_newest_first() {
        let tmp = setup();
        for ts in ["20240101-000000", "20240301-000000", "20240201-000000"] {
            fs::write(
                tmp.path().join(format!("oh-my-opencode.json.work.bak.{ts}")),
                "",
            )
            .unwrap();
        }
        fs::write(tmp.path().join("oh-my-opencode.json.other.bak.20250101-000000"), "").unwrap();

        let backups = list_profile_backups(tmp.path(), "work").unwrap();
        assert_eq!(
            backups,
            vec![
                "oh-my-opencode.json.work.bak.20240301-000000",
                "oh-my-opencode.json.work.bak.20240201-000000",
                "oh-my-opencode.json.work.bak.20240101-000000",
            ]
        );
        assert_eq!(
            latest_profile_backup(tmp.path(), "work").unwrap().as_deref(),
            Some("oh-my-opencode.json.work.bak.20240301-000000")
        );
        assert_eq!(latest_profile_backup(tmp.path(), "other2").unwrap(), None);
    }

    #[test]
    fn test_restore_takes_pre_backup() {
        let tmp = setup();
        let name = "oh-my-opencode.json.work.bak.20240101-000000";
        fs::write(tmp.path().join(name), "old").unwrap();

        let pre = restore_profile_from_backup(tmp.path(), "work", name).unwrap();
        assert_eq!(fs::read_to_string(pre).unwrap(), "current");
        assert_eq!(
            fs::read_to_string(tmp.path().join("oh-my-opencode.json.work")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_restore_rejects_foreign_backup() {
        let tmp = setup();
        let name = "oh-my-opencode.json.other.bak.20240101-000000";
        fs::write(tmp.path().join(name), "x").unwrap();
        assert!(matches!(
            restore_profile_from_backup(tmp.path(), "work", name),
            Err(ProfileError::BackupMismatch { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_outside_dir() {
        let tmp = setup();
        let elsewhere = TempDir::new().unwrap();
        let outside = elsewhere
            .path()
            .join("oh-my-opencode.json.work.bak.20240101-000000");
        fs::write(&outside, "x").unwrap();
        assert!(matches!(
            restore_profile_from_backup(tmp.path(), "work", outside.to_str().unwrap()),
            Err(ProfileError::BackupOutsideConfigDir(_))
        ));
    }
}
