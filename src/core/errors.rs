//! Domain error types
//!
//! These errors represent profile-management failures, distinct from the
//! infrastructure errors that `anyhow` carries at the binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to profile files, the active link and backups
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Empty profile name
    #[error("profile name is required")]
    NameRequired,

    /// No `oh-my-opencode.json.<name>` file for this profile
    #[error("profile not found: {0}")]
    NotFound(String),

    /// Profile path exists but is a directory
    #[error("profile is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    /// The active config exists but is neither a symlink nor a regular file
    #[error("active config is not a regular file or symlink: {}", .0.display())]
    UnsupportedActiveFile(PathBuf),

    /// Profile JSON could not be parsed
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backup file does not belong to the profile being restored
    #[error("backup {backup} does not belong to profile {profile}")]
    BackupMismatch { backup: String, profile: String },

    /// Backup path points outside the config directory
    #[error("backup must live in the config dir: {}", .0.display())]
    BackupOutsideConfigDir(PathBuf),

    /// Autofill preset name is not known
    #[error("unknown autofill preset: {0}")]
    UnknownPreset(String),

    /// Underlying filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to producing profile diffs
#[derive(Debug, Error)]
pub enum DiffError {
    /// `git` is not on PATH
    #[error("git is required for diff")]
    GitUnavailable,

    /// git exited with a status other than 0 or 1
    #[error("git diff failed: {0}")]
    GitFailed(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to the model list and its cache
#[derive(Debug, Error)]
pub enum ModelsError {
    /// The external lister could not be started or exited non-zero
    #[error("opencode models failed: {0}")]
    ListerFailed(String),

    /// The external lister exceeded its time budget
    #[error("opencode models timed out after {0:?}")]
    ListerTimedOut(std::time::Duration),

    /// The external lister printed nothing usable
    #[error("opencode models returned no models")]
    Empty,

    /// No platform config directory is available for the cache
    #[error("cannot determine config directory for the model cache")]
    NoCacheHome,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_error_messages() {
        assert_eq!(
            ProfileError::NotFound("work".into()).to_string(),
            "profile not found: work"
        );
        let err = ProfileError::BackupMismatch {
            backup: "oh-my-opencode.json.a.bak.1".into(),
            profile: "b".into(),
        };
        assert!(err.to_string().contains("does not belong to profile b"));
    }

    #[test]
    fn test_diff_error_wraps_profile_error() {
        let err: DiffError = ProfileError::NameRequired.into();
        assert_eq!(err.to_string(), "profile name is required");
        assert_eq!(DiffError::GitUnavailable.to_string(), "git is required for diff");
    }
}
