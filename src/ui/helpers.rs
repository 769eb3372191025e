//! Shared rendering utilities and helpers.
//!
//! Low-level pieces used by several components: cursor positioning, width
//! fitting and the ANSI styling of text segments.
//!
//! # Example
//!
//! ```rust
//! use jsonscope::ui::helpers::fit;
//!
//! assert_eq!(fit("hello world", 8), "hello w…");
//! assert_eq!(fit("héllo", 10), "héllo");
//! ```

use crate::app::state::MessageLevel;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Segment, SegmentStyle};
use crate::views::pretty::TokenKind;

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H` to move the cursor.
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Width of `text` in terminal cells, counting one per char.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` chars, ending in `…` when cut.
#[must_use]
pub fn fit(text: &str, max: usize) -> String {
    if width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

/// Foreground color for a syntax token.
#[must_use]
pub fn token_color(theme: &Theme, kind: TokenKind) -> &str {
    match kind {
        TokenKind::Key => &theme.colors.key_fg,
        TokenKind::String => &theme.colors.string_fg,
        TokenKind::Number => &theme.colors.number_fg,
        TokenKind::Literal => &theme.colors.literal_fg,
    }
}

/// Foreground color for a status line message.
#[must_use]
pub fn level_color(theme: &Theme, level: MessageLevel) -> &str {
    match level {
        MessageLevel::Info => &theme.colors.status_info_fg,
        MessageLevel::Warn => &theme.colors.status_warn_fg,
        MessageLevel::Error => &theme.colors.status_error_fg,
    }
}

/// Escape sequence that starts drawing a segment of `style`.
#[must_use]
pub fn segment_style(theme: &Theme, style: SegmentStyle) -> String {
    match style {
        SegmentStyle::Punctuation => Theme::fg(&theme.colors.punctuation_fg),
        SegmentStyle::Token(kind) => Theme::fg(token_color(theme, kind)),
        SegmentStyle::Match => format!(
            "{}{}",
            Theme::fg(&theme.colors.match_highlight_fg),
            Theme::bg(&theme.colors.match_highlight_bg)
        ),
        SegmentStyle::CurrentMatch => format!(
            "{}{}{}",
            Theme::bold(),
            Theme::fg(&theme.colors.current_match_fg),
            Theme::bg(&theme.colors.current_match_bg)
        ),
    }
}

/// Prints styled segments, stopping after `max` cells.
///
/// Returns the number of cells printed.
pub fn render_segments(segments: &[Segment], theme: &Theme, max: usize) -> usize {
    let mut printed = 0;
    for segment in segments {
        let room = max.saturating_sub(printed);
        if room == 0 {
            break;
        }
        let text: String = segment.text.chars().take(room).collect();
        printed += width(&text);
        print!("{}{text}{}", segment_style(theme, segment.style), Theme::reset());
    }
    printed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_is_char_safe() {
        assert_eq!(fit("ééééé", 3), "éé…");
        assert_eq!(fit("abc", 3), "abc");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn current_match_is_bold() {
        let theme = Theme::default();
        assert!(segment_style(&theme, SegmentStyle::CurrentMatch).starts_with(Theme::bold()));
        assert_eq!(
            segment_style(&theme, SegmentStyle::Token(TokenKind::Key)),
            Theme::fg(&theme.colors.key_fg)
        );
    }
}
