//! Overlays and chrome drawn around the active screen: confirmation prompt,
//! help panel and the status bar.

use super::app::{Screen, StatusKind};
use super::theme::{Mark, Theme};
use super::utils::{display_width, pad_to, truncate_width};

/// Narrowest box interior, so short prompts still read as a dialog
const MIN_BOX_INNER: usize = 10;

pub const CONFIRM_HINTS: &str = "y yes · n no · esc cancel";
pub const HELP_HINTS: &str = "any key close";

/// Key hints for the status bar of `screen`
pub fn screen_hints(screen: Screen, filter_mode: bool) -> &'static str {
    match screen {
        Screen::Profiles if filter_mode => "type filter · ctrl+u clear · enter done · esc cancel · ↑/↓ move",
        Screen::Profiles => "j/k move · / filter · enter apply · e agents · b backups · d diff · ? help · q quit",
        Screen::Backups => "j/k move · esc back · ? help · q quit",
        Screen::Diff => "j/k scroll · pgup/pgdn page · a vs active · d vs backup · esc back · ? help",
        Screen::Agents => "enter model · s save · r reload · a autofill · esc back · ? help · q quit",
        Screen::Models => "type search · ctrl+u clear · enter select · R refresh · esc cancel",
    }
}

pub fn help_title(screen: Screen) -> &'static str {
    match screen {
        Screen::Profiles => "Help: Profiles",
        Screen::Backups => "Help: Backups",
        Screen::Diff => "Help: Diff",
        Screen::Agents => "Help: Agents",
        Screen::Models => "Help: Model Picker",
    }
}

pub fn help_lines(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::Profiles => &[
            "j/k, ↑/↓   move highlight",
            "/          filter profiles",
            "enter      apply profile",
            "e          edit agents",
            "b          list backups",
            "d          diff vs last backup",
            "q, ctrl+c  quit",
        ],
        Screen::Backups => &[
            "j/k, ↑/↓   move highlight",
            "esc        back to profiles",
            "q, ctrl+c  quit",
        ],
        Screen::Diff => &[
            "j/k, ↑/↓   scroll one line",
            "pgup/pgdn  scroll one page",
            "g          go to top",
            "a          diff vs active profile",
            "d          diff vs last backup",
            "esc        back to profiles",
        ],
        Screen::Agents => &[
            "j/k, ↑/↓   move highlight",
            "enter      pick model for agent",
            "s          save changes",
            "r          reload from disk",
            "a          autofill missing models",
            "esc        back to profiles",
        ],
        Screen::Models => &[
            "type       search models",
            "ctrl+u     clear search",
            "↑/↓        move highlight",
            "enter      assign model",
            "R          refresh model list",
            "esc        cancel",
        ],
    }
}

/// Draw `lines` inside a single-line frame with `title` in a header row.
///
/// The interior is as wide as the widest line, capped by the terminal width.
pub fn render_box(title: &str, lines: &[String], width: usize) -> String {
    let widest = lines
        .iter()
        .map(|l| display_width(l))
        .chain(std::iter::once(display_width(title)))
        .max()
        .unwrap_or(0);
    let inner = widest.min(width.saturating_sub(4)).max(MIN_BOX_INNER);
    let rule = "─".repeat(inner + 2);
    let row = |text: &str| format!("│ {} │\n", pad_to(&truncate_width(text, inner), inner));

    let mut out = format!("┌{rule}┐\n");
    out.push_str(&row(title));
    out.push_str(&format!("├{rule}┤\n"));
    for line in lines {
        out.push_str(&row(line));
    }
    out.push_str(&format!("└{rule}┘\n"));
    out
}

pub fn render_confirm(prompt: &str, width: usize) -> String {
    render_box("Confirm", &[prompt.to_string(), CONFIRM_HINTS.to_string()], width)
}

pub fn render_help(screen: Screen, width: usize) -> String {
    let lines: Vec<String> = help_lines(screen).iter().map(|l| l.to_string()).collect();
    render_box(help_title(screen), &lines, width)
}

/// One-line status bar.
///
/// With no message the hints are centered; otherwise the message is on the
/// left, truncated so the hints stay visible on the right.
pub fn render_status_bar(
    theme: &Theme,
    kind: StatusKind,
    message: &str,
    hints: &str,
    width: usize,
) -> String {
    let hints = truncate_width(hints, width);
    let hints_width = display_width(&hints);
    let painted_hints = theme.paint(&hints, Mark::Hint);

    let mark = match kind {
        StatusKind::None => None,
        StatusKind::Info => Some(Mark::Info),
        StatusKind::Success => Some(Mark::Success),
        StatusKind::Error => Some(Mark::Error),
    };
    let Some(mark) = mark.filter(|_| !message.is_empty()) else {
        let left = width.saturating_sub(hints_width) / 2;
        return format!("{}{painted_hints}", " ".repeat(left));
    };

    let room = width.saturating_sub(hints_width + 1);
    let message = truncate_width(message, room);
    let message = pad_to(&message, room);
    format!("{} {painted_hints}", theme.paint(&message, mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_frame_is_rectangular() {
        let out = render_box("Title", &["a".into(), "longer line".into()], 80);
        let widths: Vec<usize> = out.lines().map(display_width).collect();
        assert_eq!(out.lines().count(), 6);
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(out.starts_with('┌'));
        assert!(out.contains("│ longer line │"));
    }

    #[test]
    fn test_box_respects_narrow_terminal() {
        let out = render_box("T", &["x".repeat(100)], 30);
        assert!(out.lines().all(|l| display_width(l) <= 30));
        assert!(out.contains('…'));
    }

    #[test]
    fn test_status_bar_centers_hints_without_message() {
        let bar = render_status_bar(&Theme::plain(), StatusKind::None, "", "abcd", 10);
        assert_eq!(bar, "   abcd");
    }

    #[test]
    fn test_status_bar_keeps_hints_visible() {
        let bar = render_status_bar(
            &Theme::plain(),
            StatusKind::Error,
            "a very long error message that does not fit",
            "q quit",
            30,
        );
        assert_eq!(display_width(&bar), 30);
        assert!(bar.ends_with("q quit"));
        assert!(bar.starts_with("a very long"));
    }

    #[test]
    fn test_every_screen_has_help() {
        for screen in [
            Screen::Profiles,
            Screen::Backups,
            Screen::Diff,
            Screen::Agents,
            Screen::Models,
        ] {
            assert!(!help_lines(screen).is_empty());
            assert!(render_help(screen, 80).contains(help_title(screen)));
        }
    }
}
