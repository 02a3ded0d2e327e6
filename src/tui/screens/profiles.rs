//! Profiles screen: list, filter, apply, and entry point to the other screens

use std::fmt::Write as _;

use crate::profile::ProfileInfo;
use crate::tui::app::{App, Confirm, StatusKind};
use crate::tui::events::Event;
use crate::tui::msg::Msg;
use crate::tui::program::Cmd;
use crate::tui::theme::Mark;
use crate::tui::utils::{anchor_by_name, filter_items, step_selection, window};

/// Profiles sub-state
///
/// `all` is never modified by filtering; `visible` is derived from it.
#[derive(Debug, Clone, Default)]
pub struct ProfilesState {
    pub all: Vec<ProfileInfo>,
    pub visible: Vec<ProfileInfo>,
    pub filter: String,
    pub filter_mode: bool,
    pub selected: Option<usize>,
}

impl ProfilesState {
    pub fn new(profiles: Vec<ProfileInfo>, active: Option<&str>) -> Self {
        let selected = anchor_by_name(&profiles, active);
        Self {
            visible: profiles.clone(),
            all: profiles,
            filter: String::new(),
            filter_mode: false,
            selected,
        }
    }

    pub fn selected_profile(&self) -> Option<&ProfileInfo> {
        self.selected.and_then(|i| self.visible.get(i))
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.selected = step_selection(self.selected, self.visible.len(), delta);
    }

    /// Recompute the visible list, keeping the highlighted name if it survives
    pub fn apply_filter(&mut self) {
        let previous = self.selected_profile().map(|p| p.name.clone());
        self.visible = filter_items(&self.all, &self.filter);
        self.selected = anchor_by_name(&self.visible, previous.as_deref());
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.apply_filter();
    }
}

impl App {
    pub(crate) fn handle_profiles_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        if self.profiles.filter_mode {
            return self.handle_filter_key(event);
        }

        match event {
            Event::Up | Event::Char('k') => self.profiles.move_selection(-1),
            Event::Down | Event::Char('j') => self.profiles.move_selection(1),
            Event::Char('/') => self.profiles.filter_mode = true,
            Event::Char('q') => return (self, Some(Cmd::quit())),
            Event::Esc if !self.profiles.filter.is_empty() => {
                self.profiles.set_filter(String::new());
            }
            Event::Esc => return (self, Some(Cmd::quit())),
            Event::Enter => self.confirm_apply(),
            Event::Char('e') => return self.open_agents(),
            Event::Char('b') => return self.open_backups(),
            Event::Char('d') => return self.open_diff_last_backup(),
            _ => {}
        }
        (self, None)
    }

    fn handle_filter_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        let profiles = &mut self.profiles;
        match event {
            Event::Enter => profiles.filter_mode = false,
            Event::Esc => {
                profiles.filter_mode = false;
                profiles.set_filter(String::new());
            }
            Event::Ctrl('u') => profiles.set_filter(String::new()),
            Event::Backspace => {
                let mut filter = profiles.filter.clone();
                filter.pop();
                profiles.set_filter(filter);
            }
            Event::Char(c) => {
                let filter = format!("{}{c}", profiles.filter);
                profiles.set_filter(filter);
            }
            Event::Up => profiles.move_selection(-1),
            Event::Down => profiles.move_selection(1),
            _ => {}
        }
        (self, None)
    }

    fn confirm_apply(&mut self) {
        let Some(profile) = self.profiles.selected_profile() else {
            self.set_status(StatusKind::Error, "No profiles available.");
            return;
        };
        let name = profile.name.clone();
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        let prompt = format!("Apply profile {name}?");
        self.confirm = Some(Confirm::new(
            prompt,
            Cmd::new(move || {
                let result = (actions.apply_profile)(&dir, &name);
                Msg::ProfileApplied { name, result }
            }),
        ));
    }

    fn require_selected(&mut self) -> Option<ProfileInfo> {
        let profile = self.profiles.selected_profile().cloned();
        if profile.is_none() {
            self.set_status(StatusKind::Error, "No profiles available.");
        }
        profile
    }

    fn open_backups(mut self) -> (Self, Option<Cmd<Msg>>) {
        let Some(profile) = self.require_selected() else {
            return (self, None);
        };
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        let cmd = Cmd::new(move || {
            let result = (actions.list_backups)(&dir, &profile.name);
            Msg::BackupsLoaded {
                profile: profile.name,
                result,
            }
        });
        (self, Some(cmd))
    }

    fn open_diff_last_backup(mut self) -> (Self, Option<Cmd<Msg>>) {
        let Some(profile) = self.require_selected() else {
            return (self, None);
        };
        let cmd = self.diff_last_backup_cmd(profile.name);
        (self, Some(cmd))
    }

    fn open_agents(mut self) -> (Self, Option<Cmd<Msg>>) {
        let Some(profile) = self.require_selected() else {
            return (self, None);
        };
        let cmd = self.load_agents_cmd(profile);
        (self, Some(cmd))
    }

    pub(crate) fn handle_profile_applied(
        mut self,
        name: String,
        result: anyhow::Result<()>,
    ) -> (Self, Option<Cmd<Msg>>) {
        if let Err(e) = result {
            self.set_status(StatusKind::Error, format!("{e:#}"));
            return (self, None);
        }
        tracing::info!("Applied profile {} from the TUI", name);
        self.set_status(StatusKind::Success, format!("Applied profile {name}"));
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        let cmd = Cmd::new(move || Msg::ActiveRefreshed((actions.active_profile)(&dir)));
        (self, Some(cmd))
    }

    pub(crate) fn handle_active_refreshed(
        mut self,
        result: anyhow::Result<Option<String>>,
    ) -> (Self, Option<Cmd<Msg>>) {
        match result {
            Ok(active) => self.active = active,
            Err(e) => self.set_status(StatusKind::Error, format!("{e:#}")),
        }
        (self, None)
    }

    pub(crate) fn view_profiles(&self) -> String {
        let theme = &self.theme;
        let state = &self.profiles;
        let mut out = String::new();
        let _ = writeln!(out, "ConfigDir: {}", self.config_dir.display());
        let _ = writeln!(out, "Active: {}", self.active.as_deref().unwrap_or("(none)"));
        if state.filter_mode || !state.filter.is_empty() {
            let cursor = if state.filter_mode { "▏" } else { "" };
            let _ = writeln!(out, "Filter: {}{cursor}", state.filter);
        }
        out.push('\n');
        let _ = writeln!(out, "{}", theme.paint("Profiles:", Mark::Title));

        if state.visible.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }

        let header = out.lines().count();
        let rows = self.body_rows().saturating_sub(header);
        for i in window(state.visible.len(), state.selected, rows) {
            let profile = &state.visible[i];
            let is_selected = state.selected == Some(i);
            let is_active = self.active.as_deref() == Some(profile.name.as_str());
            let name = &profile.name;
            let line = match (is_selected, is_active) {
                (true, true) => theme.paint(&format!("> {name}"), Mark::SelectedActive),
                (true, false) => theme.paint(&format!("> {name}"), Mark::Selected),
                (false, true) => format!("  {}", theme.paint(name, Mark::Active)),
                (false, false) => format!("  {name}"),
            };
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Path;

    fn state(names: &[&str], active: Option<&str>) -> ProfilesState {
        let profiles = names
            .iter()
            .map(|n| ProfileInfo::new(Path::new("/cfg"), *n))
            .collect();
        ProfilesState::new(profiles, active)
    }

    fn visible_names(state: &ProfilesState) -> Vec<String> {
        state.visible.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_initial_highlight_is_active() {
        let s = state(&["alpha", "beta", "gamma"], Some("beta"));
        assert_eq!(s.selected, Some(1));
        let s = state(&["alpha"], Some("zeta"));
        assert_eq!(s.selected, Some(0));
        let s = state(&[], None);
        assert_eq!(s.selected, None);
    }

    #[test]
    fn test_filter_reanchors_by_name() {
        let mut s = state(&["alpha", "beta", "gamma"], Some("gamma"));
        s.set_filter("a".into());
        assert_eq!(s.selected_profile().unwrap().name, "gamma");
        s.set_filter("be".into());
        assert_eq!(s.selected, Some(0));
        s.set_filter("zz".into());
        assert_eq!(s.selected, None);
    }

    proptest! {
        #[test]
        fn prop_highlight_stays_in_visible_bounds(
            n in 0usize..8,
            filter in "[a-c]{0,2}",
            moves in prop::collection::vec(-3isize..=3, 0..30),
        ) {
            let names: Vec<String> = (0..n).map(|i| format!("{}{}", ["a", "b", "c"][i % 3], i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut s = state(&refs, None);
            s.set_filter(filter);
            for delta in moves {
                s.move_selection(delta);
                match s.selected {
                    Some(i) => prop_assert!(i < s.visible.len()),
                    None => prop_assert!(s.visible.is_empty()),
                }
            }
        }

        #[test]
        fn prop_clearing_filter_restores_list(n in 0usize..8, filter in "[a-z0-9]{0,3}") {
            let names: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut s = state(&refs, None);
            let original = visible_names(&s);
            s.set_filter(filter.clone());
            let once = visible_names(&s);
            s.set_filter(filter);
            prop_assert_eq!(&once, &visible_names(&s));
            s.set_filter(String::new());
            prop_assert_eq!(original, visible_names(&s));
        }
    }
}
