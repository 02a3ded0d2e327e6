//! Autofill presets for agents without a model

use super::config::{AgentConfig, RootConfig};
use crate::core::ProfileError;

/// Default model assignment applied by autofill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub model: &'static str,
}

const PRESETS: &[Preset] = &[Preset {
    name: "openai",
    model: "gpt-4o-mini",
}];

/// Preset used by the interactive autofill action
pub const DEFAULT_PRESET: &str = "openai";

impl Preset {
    pub fn by_name(name: &str) -> Result<&'static Preset, ProfileError> {
        PRESETS
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ProfileError::UnknownPreset(name.to_string()))
    }
}

/// Give every absent or blank known agent the preset model.
///
/// Returns true if anything was modified.
pub fn apply_autofill(cfg: &mut RootConfig, known: &[&str], preset: &Preset) -> bool {
    let mut changed = false;
    for name in known {
        let entry = cfg
            .agents
            .entry(name.to_string())
            .or_insert_with(AgentConfig::default);
        if entry.is_missing() {
            entry.model = preset.model.to_string();
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preset() {
        assert!(Preset::by_name("openai").is_ok());
        assert!(matches!(
            Preset::by_name("nope"),
            Err(ProfileError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_fills_only_missing() {
        let preset = Preset::by_name("openai").unwrap();
        let mut cfg = RootConfig::default();
        cfg.agents
            .insert("oracle".into(), AgentConfig::with_model("o1-mini"));
        cfg.agents.insert("atlas".into(), AgentConfig::with_model(""));

        assert!(apply_autofill(&mut cfg, &["oracle", "atlas", "momus"], preset));
        assert_eq!(cfg.model_of("oracle"), "o1-mini");
        assert_eq!(cfg.model_of("atlas"), "gpt-4o-mini");
        assert_eq!(cfg.model_of("momus"), "gpt-4o-mini");

        assert!(!apply_autofill(&mut cfg, &["oracle", "atlas", "momus"], preset));
    }
}
