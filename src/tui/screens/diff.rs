//! Diff screen: colored diff of a profile in a scrollable viewport

use std::fmt::Write as _;

use crate::tui::app::{App, Screen, StatusKind};
use crate::tui::events::Event;
use crate::tui::msg::Msg;
use crate::tui::program::Cmd;
use crate::tui::theme::Mark;
use crate::tui::viewport::Viewport;

/// Lines used by the diff screen around the viewport
const DIFF_CHROME_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    #[default]
    AgainstLastBackup,
    AgainstActive,
}

#[derive(Debug, Clone, Default)]
pub struct DiffState {
    pub mode: DiffMode,
    pub profile: String,
    pub target: Option<String>,
    pub text: String,
    /// Shown instead of the diff, e.g. when no backup exists
    pub message: Option<String>,
    pub viewport: Viewport,
}

impl App {
    pub(crate) fn diff_last_backup_cmd(&self, profile: String) -> Cmd<Msg> {
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        Cmd::new(move || {
            let result = (actions.diff_against_last_backup)(&dir, &profile);
            Msg::DiffLoaded {
                profile,
                mode: DiffMode::AgainstLastBackup,
                target: None,
                result,
            }
        })
    }

    fn diff_active_cmd(&self, profile: String, active: String) -> Cmd<Msg> {
        let actions = self.actions.clone();
        let dir = self.config_dir.clone();
        Cmd::new(move || {
            let result = (actions.diff_between_profiles)(&dir, &active, &profile).map(Some);
            Msg::DiffLoaded {
                profile,
                mode: DiffMode::AgainstActive,
                target: Some(active),
                result,
            }
        })
    }

    pub(crate) fn handle_diff_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        let viewport = &mut self.diff.viewport;
        match event {
            Event::Up | Event::Char('k') => viewport.line_up(),
            Event::Down | Event::Char('j') => viewport.line_down(),
            Event::PageUp => viewport.page_up(),
            Event::PageDown => viewport.page_down(),
            Event::Char('g') => viewport.goto_top(),
            Event::Char('d') => {
                let cmd = self.diff_last_backup_cmd(self.diff.profile.clone());
                return (self, Some(cmd));
            }
            Event::Char('a') => {
                let Some(active) = self.active.clone() else {
                    self.set_status(StatusKind::Error, "No active profile to diff against.");
                    return (self, None);
                };
                let cmd = self.diff_active_cmd(self.diff.profile.clone(), active);
                return (self, Some(cmd));
            }
            Event::Esc => self.screen = Screen::Profiles,
            Event::Char('q') => return (self, Some(Cmd::quit())),
            _ => {}
        }
        (self, None)
    }

    pub(crate) fn handle_diff_loaded(
        mut self,
        profile: String,
        mode: DiffMode,
        target: Option<String>,
        result: anyhow::Result<Option<String>>,
    ) -> (Self, Option<Cmd<Msg>>) {
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                self.set_status(StatusKind::Error, format!("{e:#}"));
                return (self, None);
            }
        };

        let mut viewport = Viewport::new(self.diff_height());
        let message = match &text {
            None => Some(format!("No backups found for profile: {profile}")),
            Some(t) if t.trim().is_empty() => Some("No differences.".to_string()),
            Some(_) => None,
        };
        let text = text.unwrap_or_default();
        viewport.set_content(text.trim_end_matches('\n'));
        self.diff = DiffState {
            mode,
            profile,
            target,
            text,
            message,
            viewport,
        };
        self.screen = Screen::Diff;
        (self, None)
    }

    pub(crate) fn diff_height(&self) -> usize {
        self.body_rows().saturating_sub(DIFF_CHROME_ROWS).max(1)
    }

    pub(crate) fn view_diff(&self) -> String {
        let state = &self.diff;
        let title = match (state.mode, &state.target) {
            (DiffMode::AgainstActive, Some(target)) => {
                format!("Diff: {} vs active ({target})", state.profile)
            }
            _ => format!("Diff: {} vs last-backup", state.profile),
        };
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.theme.paint(&title, Mark::Title));
        out.push('\n');
        match &state.message {
            Some(message) => {
                let _ = writeln!(out, "{}", self.theme.paint(message, Mark::Hint));
            }
            None => {
                let _ = writeln!(out, "{}", state.viewport.view());
            }
        }
        out
    }
}
