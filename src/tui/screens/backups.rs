//! Backups screen: read-only list of a profile's backups, newest first

use std::fmt::Write as _;

use crate::tui::app::{App, Screen, StatusKind};
use crate::tui::events::Event;
use crate::tui::msg::Msg;
use crate::tui::program::Cmd;
use crate::tui::theme::Mark;
use crate::tui::utils::{step_selection, window};

#[derive(Debug, Clone, Default)]
pub struct BackupsState {
    pub profile: String,
    pub backups: Vec<String>,
    pub selected: Option<usize>,
}

impl App {
    pub(crate) fn handle_backups_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        let state = &mut self.backups;
        match event {
            Event::Up | Event::Char('k') => {
                state.selected = step_selection(state.selected, state.backups.len(), -1);
            }
            Event::Down | Event::Char('j') => {
                state.selected = step_selection(state.selected, state.backups.len(), 1);
            }
            Event::Esc => self.screen = Screen::Profiles,
            Event::Char('q') => return (self, Some(Cmd::quit())),
            _ => {}
        }
        (self, None)
    }

    pub(crate) fn handle_backups_loaded(
        mut self,
        profile: String,
        result: anyhow::Result<Vec<String>>,
    ) -> (Self, Option<Cmd<Msg>>) {
        match result {
            Ok(backups) => {
                self.backups = BackupsState {
                    selected: (!backups.is_empty()).then_some(0),
                    profile,
                    backups,
                };
                self.screen = Screen::Backups;
            }
            Err(e) => self.set_status(StatusKind::Error, format!("{e:#}")),
        }
        (self, None)
    }

    pub(crate) fn view_backups(&self) -> String {
        let state = &self.backups;
        let mut out = String::new();
        let title = format!("Backups: {}", state.profile);
        let _ = writeln!(out, "{}", self.theme.paint(&title, Mark::Title));
        out.push('\n');
        if state.backups.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }
        let rows = self.body_rows().saturating_sub(2);
        for i in window(state.backups.len(), state.selected, rows) {
            let name = &state.backups[i];
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
