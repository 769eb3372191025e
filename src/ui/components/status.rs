//! Info line renderer.
//!
//! Shows the latest status message in its severity colour, or the path of the
//! current match (or tree selection) when there is nothing to report.

use crate::ui::helpers::{fit, level_color, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::InfoLine;

pub fn render_info_line(row: usize, info: &InfoLine, theme: &Theme, cols: usize) -> usize {
    let text = fit(&format!(" {}", info.text), cols);

    position_cursor(row, 1);
    match info.level {
        Some(level) => print!("{}", Theme::fg(level_color(theme, level))),
        None => print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim)),
    }
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(width(&text))));
    print!("{}", Theme::reset());
    row + 1
}
