//! Messages fed through the application's transition function

use std::path::PathBuf;

use super::events::Event;
use super::program::Message;
use super::screens::diff::DiffMode;
use crate::profile::{ProfileInfo, RootConfig};

/// What a backup-then-write chain was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePurpose {
    Save,
    Autofill { filled: usize },
}

#[derive(Debug)]
pub enum Msg {
    Key(Event),
    Resize(u16, u16),
    Quit,

    ProfileApplied {
        name: String,
        result: anyhow::Result<()>,
    },
    ActiveRefreshed(anyhow::Result<Option<String>>),
    BackupsLoaded {
        profile: String,
        result: anyhow::Result<Vec<String>>,
    },
    /// `Ok(None)` means there was nothing to diff against
    DiffLoaded {
        profile: String,
        mode: DiffMode,
        target: Option<String>,
        result: anyhow::Result<Option<String>>,
    },

    AgentsLoaded {
        profile: ProfileInfo,
        result: anyhow::Result<RootConfig>,
    },
    AgentsBackedUp {
        purpose: SavePurpose,
        result: anyhow::Result<PathBuf>,
    },
    AgentsSaved {
        purpose: SavePurpose,
        result: anyhow::Result<()>,
    },
    AutofillApplied {
        filled: usize,
        changed: bool,
    },

    ModelsRefreshed(Vec<String>),
    ModelsRefreshFailed(anyhow::Error),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Resize(cols, rows) => Msg::Resize(cols, rows),
            other => Msg::Key(other),
        }
    }
}

impl Message for Msg {
    fn quit() -> Self {
        Msg::Quit
    }

    fn is_quit(&self) -> bool {
        matches!(self, Msg::Quit)
    }
}
