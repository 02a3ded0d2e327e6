//! Application configuration
//!
//! `moirai.json` lives next to the profiles in the config directory and only
//! carries feature switches. Command-line flags override it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::fsutil;

/// File name of the application config inside the config dir
pub const CONFIG_FILE: &str = "moirai.json";

/// Default location of the oh-my-opencode profiles
pub const DEFAULT_CONFIG_DIR: &str = "~/.config/opencode";

/// On-disk shape of `moirai.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FileConfig {
    pub enable_autofill: bool,
}

/// Resolved configuration used by the CLI and the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding `oh-my-opencode.json.*` profiles
    pub config_dir: PathBuf,
    /// Whether autofill may modify profiles
    pub enable_autofill: bool,
}

impl AppConfig {
    /// Resolve the config dir, read `moirai.json` and apply the CLI override.
    pub fn load(config_dir: Option<&str>, autofill_override: Option<bool>) -> Result<Self> {
        let config_dir = fsutil::expand_user(config_dir.unwrap_or(DEFAULT_CONFIG_DIR));
        let file = FileConfig::load(&config_dir)?;
        Ok(Self {
            enable_autofill: autofill_override.unwrap_or(file.enable_autofill),
            config_dir,
        })
    }
}

impl FileConfig {
    /// Load `moirai.json` from `dir`, or defaults if it does not exist
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::config_path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let cfg = FileConfig::load(tmp.path()).unwrap();
        assert!(!cfg.enable_autofill);
    }

    #[test]
    fn test_reads_enable_autofill() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), r#"{"enableAutofill": true}"#).unwrap();
        let cfg = AppConfig::load(tmp.path().to_str(), None).unwrap();
        assert!(cfg.enable_autofill);
        assert_eq!(cfg.config_dir, tmp.path());
    }

    #[test]
    fn test_cli_override_wins() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), r#"{"enableAutofill": true}"#).unwrap();
        let cfg = AppConfig::load(tmp.path().to_str(), Some(false)).unwrap();
        assert!(!cfg.enable_autofill);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "{nope").unwrap();
        let err = FileConfig::load(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }
}
