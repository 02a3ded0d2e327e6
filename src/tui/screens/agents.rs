//! Agents screen: per-agent model assignments of one profile

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::rc::Rc;

use crate::profile::{autofill, missing_agents, Preset, ProfileInfo, RootConfig, KNOWN_AGENTS};
use crate::tui::app::{App, Confirm, Screen, StatusKind};
use crate::tui::events::Event;
use crate::tui::msg::{Msg, SavePurpose};
use crate::tui::program::Cmd;
use crate::tui::theme::Mark;
use crate::tui::utils::{anchor_by_name, step_selection, window, Filterable};

/// Profile config shared by the agents screen and the model picker
pub type SharedConfig = Rc<RefCell<RootConfig>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentEntry {
    pub name: String,
    pub model: String,
    pub missing: bool,
}

impl Filterable for AgentEntry {
    fn filter_text(&self) -> &str {
        &self.name
    }
}

/// Known agents in canonical order, then other configured agents by name
pub fn collect_agent_entries(cfg: &RootConfig, known: &[&str]) -> Vec<AgentEntry> {
    let entry = |name: &str| {
        let model = cfg.model_of(name).to_string();
        AgentEntry {
            name: name.to_string(),
            missing: model.trim().is_empty(),
            model,
        }
    };
    let known_set: HashSet<&str> = known.iter().copied().collect();
    let mut entries: Vec<AgentEntry> = known.iter().map(|name| entry(*name)).collect();
    // agents is a BTreeMap, so the remaining names come out sorted
    entries.extend(
        cfg.agents
            .keys()
            .filter(|name| !known_set.contains(name.as_str()))
            .map(|name| entry(name.as_str())),
    );
    entries
}

#[derive(Debug, Clone, Default)]
pub struct AgentsState {
    pub profile: Option<ProfileInfo>,
    pub config: SharedConfig,
    pub entries: Vec<AgentEntry>,
    pub selected: Option<usize>,
    pub dirty: bool,
}

impl AgentsState {
    pub fn selected_entry(&self) -> Option<&AgentEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Rebuild entries from the config, keeping the highlighted agent
    pub fn refresh_entries(&mut self) {
        let previous = self.selected_entry().map(|e| e.name.clone());
        self.entries = collect_agent_entries(&self.config.borrow(), KNOWN_AGENTS);
        self.selected = anchor_by_name(&self.entries, previous.as_deref());
    }
}

impl App {
    pub(crate) fn load_agents_cmd(&self, profile: ProfileInfo) -> Cmd<Msg> {
        let actions = self.actions.clone();
        Cmd::new(move || {
            let result = (actions.load_profile)(&profile.path);
            Msg::AgentsLoaded { profile, result }
        })
    }

    pub(crate) fn handle_agents_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        match event {
            Event::Up | Event::Char('k') => {
                let state = &mut self.agents;
                state.selected = step_selection(state.selected, state.entries.len(), -1);
            }
            Event::Down | Event::Char('j') => {
                let state = &mut self.agents;
                state.selected = step_selection(state.selected, state.entries.len(), 1);
            }
            Event::Enter => return self.open_model_picker(),
            Event::Char('s') => self.confirm_save(),
            Event::Char('a') => self.confirm_autofill(),
            Event::Char('r') => match self.agents.profile.clone() {
                Some(profile) => {
                    let cmd = self.load_agents_cmd(profile);
                    return (self, Some(cmd));
                }
                None => self.set_status(StatusKind::Error, "No profile loaded."),
            },
            Event::Esc => self.screen = Screen::Profiles,
            Event::Char('q') => return (self, Some(Cmd::quit())),
            _ => {}
        }
        (self, None)
    }

    fn loaded_profile(&mut self) -> Option<ProfileInfo> {
        let profile = self.agents.profile.clone();
        if profile.is_none() {
            self.set_status(StatusKind::Error, "No profile loaded.");
        }
        profile
    }

    fn confirm_save(&mut self) {
        if !self.agents.dirty {
            self.set_status(StatusKind::Info, "No changes to save.");
            return;
        }
        let Some(profile) = self.loaded_profile() else {
            return;
        };
        let prompt = format!("Save changes to {}?", profile.name);
        let cmd = self.backup_cmd(profile.name, SavePurpose::Save);
        self.confirm = Some(Confirm::new(prompt, cmd));
    }

    fn confirm_autofill(&mut self) {
        if !self.enable_autofill {
            self.set_status(
                StatusKind::Error,
                "Autofill disabled. Run with --enable-autofill.",
            );
            return;
        }
        let Some(profile) = self.loaded_profile() else {
            return;
        };
        let preset = match Preset::by_name(autofill::DEFAULT_PRESET) {
            Ok(preset) => preset,
            Err(e) => {
                self.set_status(StatusKind::Error, e.to_string());
                return;
            }
        };

        let actions = self.actions.clone();
        let config = Rc::clone(&self.agents.config);
        let prompt = format!(
            "Autofill missing agents in {} with {} ({})?",
            profile.name, preset.name, preset.model
        );
        self.confirm = Some(Confirm::new(
            prompt,
            Cmd::new(move || {
                let mut cfg = config.borrow_mut();
                let before = missing_agents(&*cfg, KNOWN_AGENTS).len();
                let changed = (actions.apply_autofill)(&mut *cfg, KNOWN_AGENTS, preset);
                let after = missing_agents(&*cfg, KNOWN_AGENTS).len();
                Msg::AutofillApplied {
                    filled: before.saturating_sub(after),
                    changed,
                }
            }),
        ));
    }

    fn backup_cmd(&self, profile: String, purpose: SavePurpose) -> Cmd<Msg> {
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        Cmd::new(move || Msg::AgentsBackedUp {
            purpose,
            result: (actions.backup_profile)(&dir, &profile),
        })
    }

    fn write_cmd(&self, path: PathBuf, purpose: SavePurpose) -> Cmd<Msg> {
        let actions = self.actions.clone();
        let config = Rc::clone(&self.agents.config);
        Cmd::new(move || Msg::AgentsSaved {
            purpose,
            result: (actions.save_profile)(&path, &*config.borrow()),
        })
    }

    pub(crate) fn handle_agents_loaded(
        mut self,
        profile: ProfileInfo,
        result: anyhow::Result<RootConfig>,
    ) -> (Self, Option<Cmd<Msg>>) {
        let config = match result {
            Ok(config) => config,
            Err(e) => {
                self.set_status(StatusKind::Error, format!("{e:#}"));
                return (self, None);
            }
        };
        let entries = collect_agent_entries(&config, KNOWN_AGENTS);
        self.agents = AgentsState {
            selected: (!entries.is_empty()).then_some(0),
            profile: Some(profile),
            config: Rc::new(RefCell::new(config)),
            entries,
            dirty: false,
        };
        self.screen = Screen::Agents;
        (self, None)
    }

    pub(crate) fn handle_autofill_applied(
        mut self,
        filled: usize,
        changed: bool,
    ) -> (Self, Option<Cmd<Msg>>) {
        if !changed {
            self.set_status(StatusKind::Info, "No missing models to autofill.");
            return (self, None);
        }
        self.agents.dirty = true;
        self.agents.refresh_entries();
        let Some(profile) = self.loaded_profile() else {
            return (self, None);
        };
        let cmd = self.backup_cmd(profile.name, SavePurpose::Autofill { filled });
        (self, Some(cmd))
    }

    pub(crate) fn handle_agents_backed_up(
        mut self,
        purpose: SavePurpose,
        result: anyhow::Result<PathBuf>,
    ) -> (Self, Option<Cmd<Msg>>) {
        if let Err(e) = result {
            self.set_status(StatusKind::Error, format!("Backup failed: {e:#}"));
            return (self, None);
        }
        let Some(profile) = self.loaded_profile() else {
            return (self, None);
        };
        let cmd = self.write_cmd(profile.path, purpose);
        (self, Some(cmd))
    }

    pub(crate) fn handle_agents_saved(
        mut self,
        purpose: SavePurpose,
        result: anyhow::Result<()>,
    ) -> (Self, Option<Cmd<Msg>>) {
        if let Err(e) = result {
            self.set_status(StatusKind::Error, format!("Save failed: {e:#}"));
            return (self, None);
        }
        self.agents.dirty = false;
        let message = match purpose {
            SavePurpose::Save => "Saved".to_string(),
            SavePurpose::Autofill { filled } => format!("Autofilled {filled} agents"),
        };
        self.set_status(StatusKind::Success, message);
        (self, None)
    }

    pub(crate) fn view_agents(&self) -> String {
        let theme = &self.theme;
        let state = &self.agents;
        let mut out = String::new();
        let name = state.profile.as_ref().map_or("(none)", |p| p.name.as_str());
        let _ = writeln!(out, "{}", theme.paint(&format!("Profile: {name}"), Mark::Title));
        if state.dirty {
            let _ = writeln!(out, "{}", theme.paint("Unsaved changes", Mark::Dirty));
        }
        out.push('\n');
        out.push_str("Agents:\n");

        if state.entries.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }
        let rows = self.body_rows().saturating_sub(out.lines().count());
        for i in window(state.entries.len(), state.selected, rows) {
            let entry = &state.entries[i];
            let model: &str = if entry.missing { "(missing)" } else { &entry.model };
            let line = if state.selected == Some(i) {
                theme.paint(&format!("> {}: {model}", entry.name), Mark::Selected)
            } else if entry.missing {
                format!("  {}: {}", entry.name, theme.paint(model, Mark::Missing))
            } else {
                format!("  {}: {model}", entry.name)
            };
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AgentConfig;
    use proptest::prelude::*;

    #[test]
    fn test_known_agents_first_then_sorted_custom() {
        let mut cfg = RootConfig::default();
        cfg.agents
            .insert("zeta".into(), AgentConfig::with_model("m1"));
        cfg.agents
            .insert("alpha".into(), AgentConfig::with_model(""));
        cfg.agents
            .insert("oracle".into(), AgentConfig::with_model("gpt-4o"));

        let entries = collect_agent_entries(&cfg, &["sisyphus", "oracle"]);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sisyphus", "oracle", "alpha", "zeta"]);
        assert!(entries[0].missing);
        assert!(!entries[1].missing);
        assert!(entries[2].missing);
    }

    #[test]
    fn test_refresh_entries_keeps_highlight() {
        let mut state = AgentsState::default();
        state.refresh_entries();
        state.selected = state.entries.iter().position(|e| e.name == "oracle");
        state
            .config
            .borrow_mut()
            .agents
            .insert("aaa-custom".into(), AgentConfig::with_model("x"));
        state.refresh_entries();
        assert_eq!(state.selected_entry().unwrap().name, "oracle");
    }

    proptest! {
        #[test]
        fn prop_entry_order_is_deterministic(custom in prop::collection::btree_set("[a-z]{1,6}", 0..8)) {
            let mut cfg = RootConfig::default();
            for name in &custom {
                cfg.agents.insert(name.clone(), AgentConfig::with_model("m"));
            }
            let entries = collect_agent_entries(&cfg, KNOWN_AGENTS);
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            prop_assert_eq!(&names[..KNOWN_AGENTS.len()], KNOWN_AGENTS);
            let rest = &names[KNOWN_AGENTS.len()..];
            prop_assert!(rest.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(rest.iter().all(|n| !KNOWN_AGENTS.contains(n)));
        }
    }
}
