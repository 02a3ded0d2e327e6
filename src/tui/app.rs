//! Application state and transition function
//!
//! [`App`] is the single value threaded through the [`Program`] loop. Key
//! events pass the overlays first (confirmation, then help) before reaching
//! the active screen's handler in [`super::screens`].
//!
//! [`Program`]: super::program::Program

use std::path::PathBuf;

use super::actions::Actions;
use super::events::Event;
use super::msg::Msg;
use super::overlays::{self, CONFIRM_HINTS, HELP_HINTS};
use super::program::{Cmd, Model};
use super::screens::agents::AgentsState;
use super::screens::backups::BackupsState;
use super::screens::diff::DiffState;
use super::screens::models::ModelsState;
use super::screens::profiles::ProfilesState;
use super::theme::Theme;
use super::utils::truncate_width;
use crate::profile::ProfileInfo;

/// Size assumed until the terminal reports one
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Rows taken by the status bar
const STATUS_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Profiles,
    Backups,
    Diff,
    Agents,
    Models,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    None,
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
    pub clear_on_next_key: bool,
}

/// Open yes/no prompt and the work to run on yes
#[derive(Debug)]
pub struct Confirm {
    pub prompt: String,
    pub on_yes: Cmd<Msg>,
}

impl Confirm {
    pub fn new(prompt: impl Into<String>, on_yes: Cmd<Msg>) -> Self {
        Self {
            prompt: prompt.into(),
            on_yes,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub config_dir: PathBuf,
    pub enable_autofill: bool,
    pub actions: Actions,
    pub theme: Theme,

    pub screen: Screen,
    pub width: u16,
    pub height: u16,
    pub status: Status,
    pub confirm: Option<Confirm>,
    pub help_open: bool,
    pub active: Option<String>,

    pub profiles: ProfilesState,
    pub backups: BackupsState,
    pub diff: DiffState,
    pub agents: AgentsState,
    pub models: ModelsState,
}

impl App {
    pub fn new(
        config_dir: PathBuf,
        profiles: Vec<ProfileInfo>,
        active: Option<String>,
        enable_autofill: bool,
        actions: Actions,
    ) -> Self {
        let (width, height) = FALLBACK_SIZE;
        let mut app = Self {
            profiles: ProfilesState::new(profiles, active.as_deref()),
            config_dir,
            enable_autofill,
            actions,
            theme: Theme::default(),
            screen: Screen::Profiles,
            width,
            height,
            status: Status::default(),
            confirm: None,
            help_open: false,
            active,
            backups: BackupsState::default(),
            diff: DiffState::default(),
            agents: AgentsState::default(),
            models: ModelsState::default(),
        };
        app.diff.viewport.set_height(app.diff_height());
        app
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Status {
            kind,
            message: message.into(),
            clear_on_next_key: true,
        };
    }

    /// Rows available to the active screen
    pub fn body_rows(&self) -> usize {
        usize::from(self.height).saturating_sub(STATUS_ROWS)
    }

    /// Record a new terminal size; a zero dimension keeps the last known one
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        let rows = self.diff_height();
        self.diff.viewport.set_height(rows);
    }

    fn handle_key(mut self, event: Event) -> (Self, Option<Cmd<Msg>>) {
        if event == Event::CtrlC {
            return (self, Some(Cmd::quit()));
        }

        if let Some(confirm) = self.confirm.take() {
            match event {
                Event::Char('y' | 'Y') => {
                    tracing::debug!("Confirmed: {}", confirm.prompt);
                    return (self, Some(confirm.on_yes));
                }
                Event::Char('n' | 'N') | Event::Esc => {}
                _ => self.confirm = Some(confirm),
            }
            return (self, None);
        }

        let help_toggle = event.is_char('?');
        if self.status.clear_on_next_key && !help_toggle {
            self.status = Status::default();
        }
        if self.help_open {
            self.help_open = false;
            return (self, None);
        }
        if help_toggle {
            self.help_open = true;
            return (self, None);
        }

        match self.screen {
            Screen::Profiles => self.handle_profiles_key(event),
            Screen::Backups => self.handle_backups_key(event),
            Screen::Diff => self.handle_diff_key(event),
            Screen::Agents => self.handle_agents_key(event),
            Screen::Models => self.handle_models_key(event),
        }
    }

    fn hints(&self) -> &'static str {
        if self.confirm.is_some() {
            CONFIRM_HINTS
        } else if self.help_open {
            HELP_HINTS
        } else {
            overlays::screen_hints(self.screen, self.profiles.filter_mode)
        }
    }

    fn view_screen(&self) -> String {
        match self.screen {
            Screen::Profiles => self.view_profiles(),
            Screen::Backups => self.view_backups(),
            Screen::Diff => self.view_diff(),
            Screen::Agents => self.view_agents(),
            Screen::Models => self.view_models(),
        }
    }
}

impl Model for App {
    type Msg = Msg;

    fn update(self, msg: Msg) -> (Self, Option<Cmd<Msg>>) {
        match msg {
            Msg::Key(event) => self.handle_key(event),
            Msg::Resize(width, height) => {
                let mut app = self;
                app.resize(width, height);
                (app, None)
            }
            Msg::Quit => (self, None),
            Msg::ProfileApplied { name, result } => self.handle_profile_applied(name, result),
            Msg::ActiveRefreshed(result) => self.handle_active_refreshed(result),
            Msg::BackupsLoaded { profile, result } => self.handle_backups_loaded(profile, result),
            Msg::DiffLoaded {
                profile,
                mode,
                target,
                result,
            } => self.handle_diff_loaded(profile, mode, target, result),
            Msg::AgentsLoaded { profile, result } => self.handle_agents_loaded(profile, result),
            Msg::AgentsBackedUp { purpose, result } => self.handle_agents_backed_up(purpose, result),
            Msg::AgentsSaved { purpose, result } => self.handle_agents_saved(purpose, result),
            Msg::AutofillApplied { filled, changed } => self.handle_autofill_applied(filled, changed),
            Msg::ModelsRefreshed(listed) => self.handle_models_refreshed(listed),
            Msg::ModelsRefreshFailed(err) => self.handle_models_refresh_failed(err),
        }
    }

    fn view(&self) -> String {
        let width = usize::from(self.width);
        let mut body = if self.help_open {
            overlays::render_help(self.screen, width)
        } else {
            self.view_screen()
        };
        if let Some(confirm) = &self.confirm {
            if !body.ends_with('\n') {
                body.push('\n');
            }
            body.push_str(&overlays::render_confirm(&confirm.prompt, width));
        }

        // Fixed height so the status bar stays on the last row
        let rows = self.body_rows();
        let mut lines: Vec<&str> = body.lines().collect();
        if lines.len() > rows {
            let overflow = lines.len() - rows;
            if self.confirm.is_some() {
                // keep the prompt visible
                lines.drain(..overflow);
            } else {
                lines.truncate(rows);
            }
        }
        // Wrapped lines would push the status bar off screen
        let mut out = String::new();
        for line in &lines {
            out.push_str(&truncate_width(line, width));
            out.push('\n');
        }
        for _ in lines.len()..rows {
            out.push('\n');
        }
        out.push_str(&overlays::render_status_bar(
            &self.theme,
            self.status.kind,
            &self.status.message,
            self.hints(),
            width,
        ));
        out
    }
}
