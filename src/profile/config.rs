//! Profile JSON model
//!
//! Only `$schema` and the per-agent `model` are interpreted. Every other
//! field is carried through untouched so saving never drops user settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::{fsutil, ProfileError};

/// Root of an `oh-my-opencode.json.<name>` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, AgentConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `agents` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentConfig {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            extra: Map::new(),
        }
    }

    /// True when no usable model is assigned
    pub fn is_missing(&self) -> bool {
        self.model.trim().is_empty()
    }
}

impl RootConfig {
    /// Model assigned to `agent`, empty when absent
    pub fn model_of(&self, agent: &str) -> &str {
        self.agents.get(agent).map(|a| a.model.as_str()).unwrap_or("")
    }

    /// Pretty JSON with a trailing newline, as written to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Read and parse a profile file
pub fn load_profile(path: &Path) -> Result<RootConfig, ProfileError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a profile atomically, keeping the existing file's permissions
pub fn save_profile(path: &Path, cfg: &RootConfig) -> Result<(), ProfileError> {
    let mode = fsutil::file_mode(path)?;
    let data = cfg.to_json().map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fsutil::write_atomic(path, data.as_bytes(), mode)?;
    tracing::debug!("Saved profile {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
  "$schema": "https://example.invalid/schema.json",
  "agents": {
    "oracle": { "model": "gpt-4o", "temperature": 0.2 },
    "custom": {}
  },
  "disabled_hooks": ["x"]
}"#;

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let cfg: RootConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.model_of("oracle"), "gpt-4o");
        assert!(cfg.agents["custom"].is_missing());
        assert!(cfg.extra.contains_key("disabled_hooks"));
        assert!(cfg.agents["oracle"].extra.contains_key("temperature"));

        let json = cfg.to_json().unwrap();
        assert!(json.contains("\"disabled_hooks\""));
        assert!(json.contains("\"temperature\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("oh-my-opencode.json.bad");
        fs::write(&path, "{").unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(err.to_string().contains("oh-my-opencode.json.bad"));
    }

    #[test]
    fn test_save_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("oh-my-opencode.json.work");
        fs::write(&path, SAMPLE).unwrap();
        let mut cfg = load_profile(&path).unwrap();
        cfg.agents
            .insert("atlas".into(), AgentConfig::with_model("o1-mini"));
        save_profile(&path, &cfg).unwrap();
        let reloaded = load_profile(&path).unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[test]
    fn test_save_requires_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing");
        assert!(save_profile(&path, &RootConfig::default()).is_err());
    }
}
