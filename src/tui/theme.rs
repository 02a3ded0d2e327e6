//! Theme for the TUI
//!
//! Screens only ask for a [`Mark`]; the theme decides whether that becomes
//! ANSI styling or plain text.

use crossterm::style::{Attribute, Color, Stylize};

/// Abstract text markers used by the screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Selected,
    Active,
    /// Highlighted row that is also the active profile
    SelectedActive,
    Missing,
    Dirty,
    Hint,
    Title,
    Info,
    Success,
    Error,
}

/// Theme colors for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub ansi: bool,
    pub accent: Color,
    pub active: Color,
    pub missing: Color,
    pub dirty: Color,
    pub muted: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            ansi: true,
            accent: Color::Cyan,
            active: Color::Green,
            missing: Color::Red,
            dirty: Color::Yellow,
            muted: Color::DarkGrey,
            info: Color::Blue,
            success: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// No escapes at all, for tests and dumb terminals
    pub fn plain() -> Self {
        Self {
            ansi: false,
            ..Self::default()
        }
    }

    pub fn paint(&self, text: &str, mark: Mark) -> String {
        if !self.ansi || text.is_empty() {
            return text.to_string();
        }
        let styled = match mark {
            Mark::Selected => text.with(self.accent).attribute(Attribute::Bold),
            Mark::Active => text.with(self.active).attribute(Attribute::Underlined),
            Mark::SelectedActive => text
                .with(self.accent)
                .attribute(Attribute::Bold)
                .attribute(Attribute::Underlined),
            Mark::Missing => text.with(self.missing),
            Mark::Dirty => text.with(self.dirty).attribute(Attribute::Bold),
            Mark::Hint => text.with(self.muted),
            Mark::Title => text.attribute(Attribute::Bold),
            Mark::Info => text.with(self.info),
            Mark::Success => text.with(self.success),
            Mark::Error => text.with(self.error).attribute(Attribute::Bold),
        };
        styled.to_string()
    }
}
