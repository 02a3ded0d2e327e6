//! Known agents and per-agent model assignment

use super::config::{AgentConfig, RootConfig};
use crate::core::ProfileError;

/// Agents oh-my-opencode ships with, in display order
pub const KNOWN_AGENTS: &[&str] = &[
    "sisyphus",
    "prometheus",
    "oracle",
    "librarian",
    "explore",
    "multimodal-looker",
    "metis",
    "momus",
    "atlas",
];

/// Known agents that are absent or have a blank model, sorted by name
pub fn missing_agents(cfg: &RootConfig, known: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = known
        .iter()
        .filter(|name| cfg.agents.get(**name).map_or(true, AgentConfig::is_missing))
        .map(|name| name.to_string())
        .collect();
    missing.sort();
    missing
}

/// Assign `model` to `agent`, creating the entry if needed.
///
/// Returns whether the stored model actually changed. Other agent fields are
/// left as they were.
pub fn set_agent_model(cfg: &mut RootConfig, agent: &str, model: &str) -> Result<bool, ProfileError> {
    if agent.trim().is_empty() {
        return Err(ProfileError::NameRequired);
    }
    let entry = cfg.agents.entry(agent.to_string()).or_default();
    if entry.model == model {
        return Ok(false);
    }
    entry.model = model.to_string();
    Ok(true)
}
