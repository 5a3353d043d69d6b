//! Terminal display helpers for CLI tables.
//!
//! Widths are measured in terminal columns with `unicode-width`, so titles
//! with wide characters line up the same as ASCII ones.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::{terminal_size, Height, Width};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Default width when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy)]
struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

fn terminal_info() -> Terminal {
    *TERMINAL_INFO.get_or_init(|| Terminal {
        width: width_or_default(terminal_size()),
        is_tty: io::stdout().is_terminal(),
    })
}

/// Column count of a measured terminal; unknown or zero-width falls back to
/// [`DEFAULT_WIDTH`]
fn width_or_default(size: Option<(Width, Height)>) -> usize {
    size.map(|(Width(w), _)| usize::from(w))
        .filter(|&w| w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Width of the terminal in columns, or [`DEFAULT_WIDTH`] when stdout is not
/// attached to one.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate text to fit within `max_width` columns, appending an ellipsis
/// when anything was cut.
///
/// # Examples
///
/// ```
/// use scholar_discovery::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }

    format!("{}{}", fitting_prefix(text, max_width.saturating_sub(ELLIPSIS.len())), ELLIPSIS)
}

/// Longest prefix of `text` no wider than `limit` columns
fn fitting_prefix(text: &str, limit: usize) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        used += c.width().unwrap_or(1);
        if used > limit {
            return &text[..idx];
        }
    }
    text
}

/// Like [`truncate_with_ellipsis`], but cut at the last whole word that fits
/// when there is one.
pub fn truncate_at_word(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let kept = fitting_prefix(text, max_width.saturating_sub(ELLIPSIS.len()));
    // Only back off to a space when the cut landed inside a word
    let mid_word = text[kept.len()..].chars().next().is_some_and(|c| !c.is_whitespace());
    match kept.rfind(' ') {
        Some(space) if mid_word && space > 0 => {
            format!("{}{}", kept[..space].trim_end(), ELLIPSIS)
        }
        _ => format!("{}{}", kept.trim_end(), ELLIPSIS),
    }
}

/// Column widths for a results table: title, authors, venue, year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultColumns {
    pub title: usize,
    pub authors: usize,
    pub venue: usize,
    pub year: usize,
}

impl ResultColumns {
    const YEAR: usize = 4;
    /// Borders and padding drawn by a full UTF-8 table with five columns
    const CHROME: usize = 16;

    /// Split `width` roughly 2:1:1 between title, authors and venue, with
    /// floors that keep narrow terminals readable.
    pub fn for_width(width: usize) -> Self {
        let free = width.saturating_sub(Self::CHROME + Self::YEAR + 3);
        let quarter = free / 4;
        Self {
            title: (free - 2 * quarter).max(20),
            authors: quarter.max(12),
            venue: quarter.max(10),
            year: Self::YEAR,
        }
    }
}

impl Default for ResultColumns {
    fn default() -> Self {
        Self::for_width(DEFAULT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_basic() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_with_ellipsis_empty() {
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 0), "");
        assert_eq!(truncate_with_ellipsis("Hello", 1), "...");
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        // each CJK character takes two columns
        let cut = truncate_with_ellipsis("深度学习研究", 7);
        assert_eq!(cut, "深度...");
        assert!(display_width(&cut) <= 7);
    }

    #[test]
    fn test_truncate_at_word() {
        assert_eq!(truncate_at_word("The quick brown fox", 11), "The...");
        assert_eq!(truncate_at_word("The quick brown fox", 12), "The quick...");
        assert_eq!(truncate_at_word("The quick brown fox", 13), "The quick...");
        assert_eq!(truncate_at_word("Supercalifragilistic", 10), "Superca...");
    }

    #[test]
    fn test_width_from_measured_terminal() {
        assert_eq!(width_or_default(Some((Width(160), Height(48)))), 160);
        assert_eq!(width_or_default(Some((Width(0), Height(0)))), DEFAULT_WIDTH);
        assert_eq!(width_or_default(None), DEFAULT_WIDTH);
    }

    #[test]
    fn test_result_columns_fit() {
        let cols = ResultColumns::for_width(120);
        assert!(cols.title >= cols.authors);
        assert!(cols.title + cols.authors + cols.venue + cols.year <= 120);

        let narrow = ResultColumns::for_width(20);
        assert_eq!(narrow.title, 20);
        assert_eq!(narrow.authors, 12);
    }
}
