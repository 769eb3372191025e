//! Text body renderer: line numbers and syntax-coloured segments.

use crate::ui::helpers::{position_cursor, render_segments};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::TextLine;

/// Renders text lines starting at `row`.
///
/// # Returns
///
/// The next available row position.
pub fn render_text_lines(
    row: usize,
    lines: &[TextLine],
    gutter: usize,
    theme: &Theme,
    cols: usize,
) -> usize {
    let content_width = cols.saturating_sub(gutter + 3);
    let mut current_row = row;

    for line in lines {
        position_cursor(current_row, 1);
        if line.is_focus {
            print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{:>gutter$}", line.number);
        print!("{}", Theme::reset());
        print!("{} │ {}", Theme::fg(&theme.colors.border), Theme::reset());

        let used = render_segments(&line.segments, theme, content_width);
        print!("{}", " ".repeat(content_width.saturating_sub(used)));
        current_row += 1;
    }
    current_row
}
