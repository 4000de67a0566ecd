//! Shared rendering utilities and helpers.
//!
//! Text styling is optional: with [`Style::plain`] the renderer emits bare
//! text and marks fuzzy matches with brackets, which keeps output readable in
//! logs and assertable in tests.
//!
//! # Example
//!
//! ```rust
//! use dexy::ui::helpers::{highlighted, Style};
//!
//! let text = highlighted("my-ape", &[(0, 2), (3, 4)], Style::plain());
//! assert_eq!(text, "[my]-[a]pe");
//! ```

use crate::domain::NotificationLevel;

const RESET: &str = "\u{1b}[0m";
const BOLD: &str = "\u{1b}[1m";
const DIM: &str = "\u{1b}[2m";
const MATCH: &str = "\u{1b}[30;43m";
const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const CYAN: &str = "\u{1b}[36m";

/// Whether ANSI escape sequences are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    ansi: bool,
}

impl Style {
    #[must_use]
    pub const fn ansi() -> Self {
        Self { ansi: true }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self { ansi: false }
    }

    fn wrap(self, code: &str, text: &str) -> String {
        if self.ansi {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn bold(self, text: &str) -> String {
        self.wrap(BOLD, text)
    }

    #[must_use]
    pub fn dim(self, text: &str) -> String {
        self.wrap(DIM, text)
    }

    #[must_use]
    pub fn level(self, level: NotificationLevel, text: &str) -> String {
        match level {
            NotificationLevel::Info => self.wrap(CYAN, text),
            NotificationLevel::Success => self.wrap(GREEN, text),
            NotificationLevel::Error => self.wrap(RED, text),
        }
    }

    fn matched(self, text: &str) -> String {
        if self.ansi {
            format!("{MATCH}{text}{RESET}")
        } else {
            format!("[{text}]")
        }
    }
}

/// Renders `text` with the character ranges in `ranges` marked as matches.
///
/// Ranges are `(start, end)` character indices, end exclusive, in ascending
/// order. Out-of-range ends are clamped.
#[must_use]
pub fn highlighted(text: &str, ranges: &[(usize, usize)], style: Style) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        out.extend(&chars[current_pos..start]);
        let section: String = chars[start..end].iter().collect();
        out.push_str(&style.matched(&section));
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

/// Pads or truncates `text` to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text}{}", " ".repeat(width - count));
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut truncated: String = text.chars().take(width - 3).collect();
    truncated.push_str("...");
    truncated
}

/// A horizontal rule `cols` wide.
#[must_use]
pub fn rule(cols: usize) -> String {
    "-".repeat(cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_are_bracketed_in_plain_style() {
        assert_eq!(highlighted("gallery", &[(0, 1), (4, 6)], Style::plain()), "[g]all[er]y");
    }

    #[test]
    fn highlight_ranges_past_the_end_are_clamped() {
        assert_eq!(highlighted("ape", &[(1, 10)], Style::plain()), "a[pe]");
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("ape", 5), "ape  ");
        assert_eq!(fit("bored ape yacht", 8), "bored...");
    }

    #[test]
    fn ansi_style_wraps_text() {
        assert_eq!(Style::ansi().bold("x"), "\u{1b}[1mx\u{1b}[0m");
        assert_eq!(Style::plain().bold("x"), "x");
    }
}
