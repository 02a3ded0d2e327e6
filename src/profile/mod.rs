//! Profile discovery and the oh-my-opencode profile model
//!
//! A profile named `work` is the file `oh-my-opencode.json.work` in the config
//! directory. Files carrying the `.bak.` marker are backups, never profiles.

pub mod agents;
pub mod autofill;
pub mod config;
pub mod diff;

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::ProfileError;

pub use agents::{missing_agents, set_agent_model, KNOWN_AGENTS};
pub use autofill::{apply_autofill, Preset};
pub use config::{AgentConfig, RootConfig};

/// Name of the active config link consulted by opencode
pub const ACTIVE_FILE: &str = "oh-my-opencode.json";

/// Prefix of every profile file name
pub const PROFILE_PREFIX: &str = "oh-my-opencode.json.";

/// Marker separating a backed-up file name from its timestamp
pub const BACKUP_MARKER: &str = ".bak.";

/// A discovered profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInfo {
    pub name: String,
    pub path: PathBuf,
}

impl ProfileInfo {
    pub fn new(dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: profile_path(dir, &name),
            name,
        }
    }
}

/// Path of the profile file for `name`
pub fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{PROFILE_PREFIX}{name}"))
}

/// Profile name encoded in a file name, if it is a profile file
pub fn profile_name_from_file(file_name: &str) -> Option<&str> {
    if file_name.contains(BACKUP_MARKER) {
        return None;
    }
    file_name
        .strip_prefix(PROFILE_PREFIX)
        .filter(|name| !name.is_empty())
}

/// Return the profiles in `dir`, sorted by name
pub fn discover_profiles(dir: &Path) -> Result<Vec<ProfileInfo>, ProfileError> {
    let mut profiles = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = profile_name_from_file(&file_name.to_string_lossy()).map(str::to_string)
        else {
            continue;
        };
        profiles.push(ProfileInfo {
            name,
            path: entry.path(),
        });
    }
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(profiles)
}

/// Check that the profile file exists and is not a directory
pub fn ensure_profile(dir: &Path, name: &str) -> Result<PathBuf, ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::NameRequired);
    }
    let path = profile_path(dir, name);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => Err(ProfileError::IsDirectory(path)),
        Ok(_) => Ok(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ProfileError::NotFound(name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_profile_name_from_file() {
        assert_eq!(profile_name_from_file("oh-my-opencode.json.work"), Some("work"));
        assert_eq!(profile_name_from_file("oh-my-opencode.json."), None);
        assert_eq!(profile_name_from_file("oh-my-opencode.json"), None);
        assert_eq!(
            profile_name_from_file("oh-my-opencode.json.work.bak.20240101-000000"),
            None
        );
    }

    #[test]
    fn test_discover_sorts_and_skips_backups() {
        let tmp = TempDir::new().unwrap();
        for name in [
            "oh-my-opencode.json.zeta",
            "oh-my-opencode.json.alpha",
            "oh-my-opencode.json.alpha.bak.20240101-000000",
            "oh-my-opencode.json",
            "moirai.json",
        ] {
            fs::write(tmp.path().join(name), "{}").unwrap();
        }
        fs::create_dir(tmp.path().join("oh-my-opencode.json.dir")).unwrap();

        let names: Vec<_> = discover_profiles(tmp.path())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_ensure_profile_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            ensure_profile(tmp.path(), ""),
            Err(ProfileError::NameRequired)
        ));
        assert!(matches!(
            ensure_profile(tmp.path(), "nope"),
            Err(ProfileError::NotFound(_))
        ));
        fs::create_dir(tmp.path().join("oh-my-opencode.json.dir")).unwrap();
        assert!(matches!(
            ensure_profile(tmp.path(), "dir"),
            Err(ProfileError::IsDirectory(_))
        ));
    }
}
