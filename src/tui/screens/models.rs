//! Model picker: searchable model list for one agent

use std::fmt::Write as _;
use std::rc::Rc;

use super::agents::SharedConfig;
use crate::models::{refresh_due, CACHE_TTL};
use crate::profile::set_agent_model;
use crate::tui::app::{App, Screen, StatusKind};
use crate::tui::events::Event;
use crate::tui::msg::Msg;
use crate::tui::program::Cmd;
use crate::tui::theme::Mark;
use crate::tui::utils::{anchor_by_name, filter_items, step_selection, window};

/// Lines above the model list
const PICKER_HEADER_ROWS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ModelsState {
    pub target_agent: String,
    /// Config of the agents screen, written on selection
    pub config: Option<SharedConfig>,
    pub all: Vec<String>,
    pub search: String,
    pub filtered: Vec<String>,
    pub selected: Option<usize>,
}

impl ModelsState {
    pub fn selected_model(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.filtered.get(i))
            .map(String::as_str)
    }

    /// Search edit: recompute the filtered list and go back to the top
    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.filtered = filter_items(&self.all, &self.search);
        self.selected = (!self.filtered.is_empty()).then_some(0);
    }

    /// Swap in a new full list, keeping the search and, if possible, the
    /// highlighted model
    pub fn replace_all(&mut self, all: Vec<String>) {
        let previous = self.selected_model().map(str::to_string);
        self.all = all;
        self.filtered = filter_items(&self.all, &self.search);
        self.selected = anchor_by_name(&self.filtered, previous.as_deref());
    }
}

impl App {
    pub(crate) fn open_model_picker(mut self) -> (Self, Option<Cmd<Msg>>) {
        let Some(agent) = self.agents.selected_entry().map(|e| e.name.clone()) else {
            self.set_status(StatusKind::Error, "No agents available.");
            return (self, None);
        };
        let mut state = ModelsState {
            target_agent: agent,
            config: Some(Rc::clone(&self.agents.config)),
            all: (self.actions.load_model_list)(),
            ..ModelsState::default()
        };
        state.set_search(String::new());
        self.models = state;
        self.screen = Screen::Models;

        let cmd = self.schedule_model_refresh(false);
        if cmd.is_some() {
            self.set_status(StatusKind::Info, "Refreshing models...");
        }
        (self, cmd)
    }

    /// Deferred refresh from the external lister.
    ///
    /// Skipped while the cache is fresh unless `force` is set. A list that
    /// differs from the one on screen is written to the cache.
    pub(crate) fn schedule_model_refresh(&self, force: bool) -> Option<Cmd<Msg>> {
        if !force && !refresh_due((self.actions.model_cache_age)(), CACHE_TTL, false) {
            return None;
        }
        let actions = self.actions.clone();
        let current = self.models.all.clone();
        Some(Cmd::new(move || match (actions.list_models)() {
            Ok(listed) => {
                if listed != current {
                    if let Err(e) = (actions.save_model_cache)(&listed) {
                        tracing::warn!("Failed to cache model list: {:#}", e);
                    }
                }
                Msg::ModelsRefreshed(listed)
            }
            Err(e) => Msg::ModelsRefreshFailed(e),
        }))
    }

    pub(crate) fn handle_models_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        let state = &mut self.models;
        match event {
            Event::Esc => self.screen = Screen::Agents,
            Event::Enter => self.select_model(),
            Event::Up => state.selected = step_selection(state.selected, state.filtered.len(), -1),
            Event::Down => state.selected = step_selection(state.selected, state.filtered.len(), 1),
            Event::PageUp => {
                let page = -(self.picker_rows().max(1) as isize);
                let state = &mut self.models;
                state.selected = step_selection(state.selected, state.filtered.len(), page);
            }
            Event::PageDown => {
                let page = self.picker_rows().max(1) as isize;
                let state = &mut self.models;
                state.selected = step_selection(state.selected, state.filtered.len(), page);
            }
            Event::Char('R') => {
                let cmd = self.schedule_model_refresh(true);
                self.set_status(StatusKind::Info, "Refreshing models...");
                return (self, cmd);
            }
            Event::Ctrl('u') => state.set_search(String::new()),
            Event::Backspace => {
                let mut search = state.search.clone();
                search.pop();
                state.set_search(search);
            }
            Event::Char(c) => {
                let search = format!("{}{c}", state.search);
                state.set_search(search);
            }
            _ => {}
        }
        (self, None)
    }

    fn select_model(&mut self) {
        self.screen = Screen::Agents;
        let Some(model) = self.models.selected_model().map(str::to_string) else {
            self.set_status(StatusKind::Info, "No model selected.");
            return;
        };
        let Some(config) = self.models.config.clone() else {
            self.set_status(StatusKind::Error, "No profile loaded.");
            return;
        };
        let agent = self.models.target_agent.clone();
        let result = set_agent_model(&mut config.borrow_mut(), &agent, &model);
        match result {
            Ok(changed) => {
                if changed {
                    self.agents.dirty = true;
                }
                self.agents.refresh_entries();
                self.set_status(StatusKind::Success, format!("{agent} → {model}"));
            }
            Err(e) => self.set_status(StatusKind::Error, e.to_string()),
        }
    }

    pub(crate) fn handle_models_refreshed(mut self, listed: Vec<String>) -> (Self, Option<Cmd<Msg>>) {
        if listed == self.models.all {
            self.set_status(StatusKind::Info, "Models up to date.");
        } else {
            let count = listed.len();
            self.models.replace_all(listed);
            self.set_status(StatusKind::Success, format!("Loaded {count} models."));
        }
        (self, None)
    }

    pub(crate) fn handle_models_refresh_failed(
        mut self,
        err: anyhow::Error,
    ) -> (Self, Option<Cmd<Msg>>) {
        tracing::warn!("Model refresh failed: {:#}", err);
        self.set_status(StatusKind::Error, format!("Refresh failed: {err:#}"));
        (self, None)
    }

    fn picker_rows(&self) -> usize {
        self.body_rows().saturating_sub(PICKER_HEADER_ROWS)
    }

    pub(crate) fn view_models(&self) -> String {
        let state = &self.models;
        let mut out = String::new();
        let title = format!("Model Picker: {}", state.target_agent);
        let _ = writeln!(out, "{}", self.theme.paint(&title, Mark::Title));
        let _ = writeln!(out, "Search: {}▏", state.search);
        out.push('\n');
        if state.filtered.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }
        for i in window(state.filtered.len(), state.selected, self.picker_rows()) {
            let name = &state.filtered[i];
            let line = if state.selected == Some(i) {
                self.theme.paint(&format!("> {name}"), Mark::Selected)
            } else {
                format!("  {name}")
            };
            let _ = writeln!(out, "{line}");
        }
        out
    }
}
