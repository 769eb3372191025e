//! Tree body renderer.
//!
//! One row per visible node: indentation, expansion glyph, label and a dimmed
//! preview of the value. Marked rows use the match colours on the part that
//! matched; the current match gets the stronger colour.

use crate::search::MatchKind;
use crate::ui::helpers::{fit, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::TreeRow;

/// Renders tree rows starting at `row`.
///
/// # Returns
///
/// The next available row position.
pub fn render_tree_rows(row: usize, rows: &[TreeRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in rows {
        current_row = render_tree_row(current_row, item, theme, cols);
    }
    current_row
}

fn base_style(item: &TreeRow, theme: &Theme) -> String {
    if item.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    }
}

fn part_style(item: &TreeRow, part: MatchKind, theme: &Theme) -> Option<String> {
    match item.current {
        Some(kind) => (kind == part).then(|| {
            format!(
                "{}{}{}",
                Theme::bold(),
                Theme::fg(&theme.colors.current_match_fg),
                Theme::bg(&theme.colors.current_match_bg)
            )
        }),
        // Marks do not record which part matched; flag the label.
        None => (item.is_marked && part == MatchKind::Key).then(|| {
            format!(
                "{}{}",
                Theme::fg(&theme.colors.match_highlight_fg),
                Theme::bg(&theme.colors.match_highlight_bg)
            )
        }),
    }
}

fn render_tree_row(row: usize, item: &TreeRow, theme: &Theme, cols: usize) -> usize {
    let base = base_style(item, theme);
    let prefix = format!("{}{} ", "  ".repeat(item.depth), item.glyph);
    let prefix = fit(&prefix, cols);
    let label = fit(&item.label, cols.saturating_sub(width(&prefix)));
    let preview = fit(
        &format!(": {}", item.preview),
        cols.saturating_sub(width(&prefix) + width(&label)),
    );

    position_cursor(row, 1);
    print!("{base}{prefix}");

    match part_style(item, MatchKind::Key, theme) {
        Some(style) => print!("{style}{label}{}{base}", Theme::reset()),
        None => print!("{}{label}{base}", Theme::fg(&theme.colors.key_fg)),
    }

    match part_style(item, MatchKind::Value, theme) {
        Some(style) => print!("{style}{preview}{}{base}", Theme::reset()),
        None => print!("{}{preview}{base}", Theme::fg(&theme.colors.text_dim)),
    }

    let used = width(&prefix) + width(&label) + width(&preview);
    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
