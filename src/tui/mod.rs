//! Terminal User Interface (TUI) for switching and editing profiles
//!
//! A small message-passing runtime ([`program`]) drives the [`App`] state
//! machine over a raw-mode terminal. All filesystem and process work goes
//! through the injected [`Actions`] table.

pub mod actions;
pub mod app;
pub mod events;
pub mod msg;
pub mod overlays;
pub mod program;
pub mod screens;
pub mod terminal;
pub mod theme;
pub mod utils;
pub mod viewport;

pub use actions::Actions;
pub use app::{App, Screen, StatusKind};
pub use events::{Event, EventHandler};
pub use msg::Msg;
pub use program::{Cmd, Message, Model, Program};
pub use terminal::{CrosstermTerminal, HeadlessTerminal, RawModeGuard, TerminalControl};
pub use theme::Theme;

use anyhow::Context;
use thiserror::Error;

use crate::config::AppConfig;
use crate::{profile, storage};

/// Fatal errors of the runtime; everything else ends up in the status bar
#[derive(Debug, Error)]
pub enum TuiError {
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    #[error("input stream closed")]
    InputClosed,

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to draw frame: {0}")]
    Render(#[source] std::io::Error),
}

/// Run the interactive app on the controlling terminal until the user quits
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let profiles = profile::discover_profiles(&config.config_dir).with_context(|| {
        format!("Failed to list profiles in {}", config.config_dir.display())
    })?;
    let active = storage::active_profile(&config.config_dir)?;
    tracing::info!(
        "Starting TUI with {} profiles (active: {})",
        profiles.len(),
        active.as_deref().unwrap_or("none")
    );

    let app = App::new(
        config.config_dir.clone(),
        profiles,
        active,
        config.enable_autofill,
        Actions::default(),
    );
    let mut program = Program::new(CrosstermTerminal, std::io::stdin(), std::io::stdout());
    let result = program.run(app);
    // leave the prompt below the last frame
    println!();
    result?;
    tracing::info!("TUI exited");
    Ok(())
}
