//! Header component renderer.
//!
//! Draws the title with the document source on the left and the view tabs
//! (plus the result indicator) on the right.

use crate::ui::helpers::{fit, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header bar at the specified row.
///
/// # Parameters
///
/// * `row` - Row position to render the header (1-indexed)
/// * `header` - Title, source and tabs
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 1)
///
/// # Layout
///
/// ```text
///  jsonscope  ~/out/analysis.json · 12:04:31 UTC        [2/7]  Tree  Text
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let tabs: Vec<String> = header.tabs.iter().map(|tab| format!(" {} ", tab.label)).collect();
    let indicator = header.indicator.as_ref().map(|i| format!("[{i}] ")).unwrap_or_default();
    let right_len = width(&indicator) + tabs.iter().map(|t| width(t) + 1).sum::<usize>();

    let mut left = header.title.clone();
    match (&header.source, &header.received) {
        (Some(source), Some(received)) => left.push_str(&format!(" {source} · {received}")),
        (Some(source), None) => left.push_str(&format!(" {source}")),
        _ => {}
    }
    let left = fit(&left, cols.saturating_sub(right_len + 1));
    let gap = cols.saturating_sub(width(&left) + right_len);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{left}");
    print!("{}", " ".repeat(gap));
    print!("{indicator}");
    print!("{}", Theme::reset());

    for (tab, text) in header.tabs.iter().zip(&tabs) {
        if tab.active {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.tab_active_fg));
            print!("{}", Theme::bg(&theme.colors.tab_active_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{text}");
        print!("{} ", Theme::reset());
    }
    row + 1
}
