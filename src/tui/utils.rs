//! Utility functions for TUI

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::profile::ProfileInfo;

/// Trait for types that can be filtered by text
pub trait Filterable {
    /// Get the text to use for filtering
    fn filter_text(&self) -> &str;
}

/// Filter items by text, case-insensitive
///
/// Returns clones of all items if filter is empty, otherwise those whose
/// filter_text() contains the filter string. The source slice is untouched.
pub fn filter_items<T: Filterable + Clone>(items: &[T], filter: &str) -> Vec<T> {
    if filter.is_empty() {
        return items.to_vec();
    }
    let filter_lower = filter.to_lowercase();
    items
        .iter()
        .filter(|item| item.filter_text().to_lowercase().contains(&filter_lower))
        .cloned()
        .collect()
}

impl Filterable for ProfileInfo {
    fn filter_text(&self) -> &str {
        &self.name
    }
}

impl Filterable for String {
    fn filter_text(&self) -> &str {
        self
    }
}

/// Move an optional highlight by `delta`, clamped to `[0, len-1]`
pub fn step_selection(selected: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = selected.unwrap_or(0).min(len - 1) as isize;
    Some((current + delta).clamp(0, len as isize - 1) as usize)
}

/// Index of `name` in `items`, else 0, else `None` for an empty list
pub fn anchor_by_name<T: Filterable>(items: &[T], name: Option<&str>) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let found = name.and_then(|name| items.iter().position(|item| item.filter_text() == name));
    Some(found.unwrap_or(0))
}

/// Range of at most `rows` indices that keeps `selected` in view.
///
/// `rows == 0` means the height is unknown and everything is shown.
pub fn window(len: usize, selected: Option<usize>, rows: usize) -> std::ops::Range<usize> {
    if rows == 0 || len <= rows {
        return 0..len;
    }
    let selected = selected.unwrap_or(0).min(len - 1);
    let start = (selected + 1).saturating_sub(rows);
    start..start + rows
}

/// Display width of `s`, ignoring ANSI escapes
pub fn display_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Cut `s` to at most `max` columns, ending with `…` when shortened.
///
/// ANSI escapes are kept and take no width; a cut styled line ends with a
/// reset so the style does not leak into what follows.
pub fn truncate_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    let mut styled = false;
    let mut pos = 0;
    while pos < s.len() {
        if let Some(m) = ANSI_RE.find_at(s, pos).filter(|m| m.start() == pos) {
            out.push_str(m.as_str());
            styled = true;
            pos = m.end();
            continue;
        }
        let Some(c) = s[pos..].chars().next() else {
            break;
        };
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
        pos += c.len_utf8();
    }
    out.push('…');
    if styled {
        out.push_str(ANSI_RESET);
    }
    out
}

/// Right-pad `s` with spaces to `width` columns
pub fn pad_to(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

const ANSI_RESET: &str = "\x1b[0m";

static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ANSI pattern is valid"));

/// Remove ANSI escape sequences
pub fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    ANSI_RE.replace_all(s, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestItem {
        name: String,
    }

    impl Filterable for TestItem {
        fn filter_text(&self) -> &str {
            &self.name
        }
    }

    fn items(names: &[&str]) -> Vec<TestItem> {
        names
            .iter()
            .map(|n| TestItem {
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_filter_empty() {
        let filtered = filter_items(&items(&["foo", "bar"]), "");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_case_insensitive() {
        let filtered = filter_items(&items(&["FooBar", "bazqux"]), "FOO");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "FooBar");
    }

    #[test]
    fn test_step_selection_clamps() {
        assert_eq!(step_selection(None, 0, 1), None);
        assert_eq!(step_selection(Some(0), 3, -1), Some(0));
        assert_eq!(step_selection(Some(2), 3, 1), Some(2));
        assert_eq!(step_selection(Some(1), 3, 10), Some(2));
        assert_eq!(step_selection(None, 3, 1), Some(1));
    }

    #[test]
    fn test_anchor_by_name() {
        let list = items(&["a", "b"]);
        assert_eq!(anchor_by_name(&list, Some("b")), Some(1));
        assert_eq!(anchor_by_name(&list, Some("z")), Some(0));
        assert_eq!(anchor_by_name::<TestItem>(&[], Some("a")), None);
    }

    #[test]
    fn test_window_follows_selection() {
        assert_eq!(window(3, Some(2), 0), 0..3);
        assert_eq!(window(3, Some(2), 5), 0..3);
        assert_eq!(window(10, Some(1), 4), 0..4);
        assert_eq!(window(10, Some(9), 4), 6..10);
        assert_eq!(window(10, None, 4), 0..4);
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate_width("abcdef", 4), "abc…");
        assert_eq!(truncate_width("abc", 4), "abc");
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(display_width("\x1b[1mab\x1b[0m"), 2);
    }

    #[test]
    fn test_truncate_keeps_escapes_out_of_width() {
        let green = "\x1b[32m+added line\x1b[0m";
        assert_eq!(truncate_width(green, 20), green);
        let cut = truncate_width(green, 4);
        assert_eq!(strip_ansi(&cut), "+ad…");
        assert!(cut.starts_with("\x1b[32m"));
        assert!(cut.ends_with(ANSI_RESET));
        assert_eq!(display_width(&cut), 4);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[32m+x\x1b[m"), "+x");
    }
}
