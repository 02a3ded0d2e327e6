//! Terminal mode control
//!
//! Raw mode delivers input byte by byte with no echo or line editing. The
//! guard returned by [`TerminalControl::enter_raw_mode`] puts the previous
//! mode back exactly once, either through [`RawModeGuard::restore`] or on drop.

use std::cell::Cell;
use std::rc::Rc;

use super::TuiError;

/// Access to the terminal device
pub trait TerminalControl {
    /// Switch the device to raw mode
    fn enter_raw_mode(&mut self) -> Result<RawModeGuard, TuiError>;

    /// Current (columns, rows), `None` when unknown
    fn size(&self) -> Option<(u16, u16)>;
}

/// Restores the terminal mode that was active before raw mode
pub struct RawModeGuard {
    restore: Option<Box<dyn FnOnce()>>,
}

impl RawModeGuard {
    pub fn new(restore: impl FnOnce() + 'static) -> Self {
        Self {
            restore: Some(Box::new(restore)),
        }
    }

    /// Restore now instead of at drop
    pub fn restore(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("armed", &self.restore.is_some())
            .finish()
    }
}

/// The process's controlling terminal, via crossterm
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl TerminalControl for CrosstermTerminal {
    fn enter_raw_mode(&mut self) -> Result<RawModeGuard, TuiError> {
        crossterm::terminal::enable_raw_mode().map_err(TuiError::TerminalInit)?;
        tracing::debug!("Entered raw mode");
        Ok(RawModeGuard::new(|| {
            if let Err(e) = crossterm::terminal::disable_raw_mode() {
                tracing::error!("Failed to restore terminal mode: {}", e);
            }
        }))
    }

    fn size(&self) -> Option<(u16, u16)> {
        crossterm::terminal::size()
            .ok()
            .filter(|&(cols, rows)| cols > 0 && rows > 0)
    }
}

/// Terminal stand-in for running the program without a device
#[derive(Debug, Clone, Default)]
pub struct HeadlessTerminal {
    size: Option<(u16, u16)>,
    fail_raw_mode: bool,
    entered: Rc<Cell<u32>>,
    restored: Rc<Cell<u32>>,
}

impl HeadlessTerminal {
    pub fn new(size: Option<(u16, u16)>) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// A device that refuses raw mode
    pub fn unsupported() -> Self {
        Self {
            fail_raw_mode: true,
            ..Self::default()
        }
    }

    /// Number of times raw mode was entered
    pub fn entered(&self) -> u32 {
        self.entered.get()
    }

    /// Number of times the previous mode was restored
    pub fn restored(&self) -> u32 {
        self.restored.get()
    }
}

impl TerminalControl for HeadlessTerminal {
    fn enter_raw_mode(&mut self) -> Result<RawModeGuard, TuiError> {
        if self.fail_raw_mode {
            return Err(TuiError::TerminalInit(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "not a terminal",
            )));
        }
        self.entered.set(self.entered.get() + 1);
        let restored = Rc::clone(&self.restored);
        Ok(RawModeGuard::new(move || restored.set(restored.get() + 1)))
    }

    fn size(&self) -> Option<(u16, u16)> {
        self.size
    }
}
