//! Colored profile diffs via `git diff --no-index`

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use super::ensure_profile;
use crate::core::{DiffError, ProfileError};

/// Diff of two arbitrary files, colored for the terminal.
///
/// git exits 1 when the files differ, which is not a failure here.
pub fn git_diff_no_index(old: &Path, new: &Path) -> Result<String, DiffError> {
    let output = Command::new("git")
        .args(["--no-pager", "diff", "--no-index", "--color=always"])
        .arg(old)
        .arg(new)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => DiffError::GitUnavailable,
            _ => DiffError::Io(e),
        })?;

    match output.status.code() {
        Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            Err(DiffError::GitFailed(reason))
        }
    }
}

/// Diff between profiles `a` and `b` in `dir`
pub fn diff_profiles(dir: &Path, a: &str, b: &str) -> Result<String, DiffError> {
    let path_a = ensure_profile(dir, a)?;
    let path_b = ensure_profile(dir, b)?;
    git_diff_no_index(&path_a, &path_b)
}

/// Diff from `other` (absolute, or relative to `dir`) to profile `name`
pub fn diff_profile_against_file(dir: &Path, name: &str, other: &str) -> Result<String, DiffError> {
    if other.is_empty() {
        return Err(ProfileError::NameRequired.into());
    }
    let profile = ensure_profile(dir, name)?;
    let other_path = if Path::new(other).is_absolute() {
        Path::new(other).to_path_buf()
    } else {
        dir.join(other)
    };
    std::fs::metadata(&other_path)?;
    git_diff_no_index(&other_path, &profile)
}
