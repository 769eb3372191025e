//! Composable UI component renderers.
//!
//! Each component is responsible for rendering a specific part of the
//! interface and returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title, document source, view tabs and result indicator
//! - [`status`]: Status message or current path
//! - [`search`]: Search input box (border, query text, indicator)
//! - [`tree`]: Tree body rows
//! - [`text`]: Text body lines
//! - [`footer`]: Help text and keybinding hints
//! - [`empty`]: Message shown before the first document arrives
//!
//! # Layout Modes
//!
//! The module provides two high-level layout functions:
//!
//! - [`render_normal_mode`]: Header + Info + Body + Footer
//! - [`render_search_mode`]: Header + Info + `SearchBar` + Body + Footer

mod empty;
mod footer;
mod header;
mod search;
mod status;
mod text;
mod tree;

pub use empty::render_empty_state;

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, SearchBarInfo, UIViewModel};

use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use status::render_info_line;
use text::render_text_lines;
use tree::render_tree_rows;

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

fn render_body(row: usize, body: &BodyView, theme: &Theme, cols: usize) -> usize {
    match body {
        BodyView::Tree { rows } => render_tree_rows(row, rows, theme, cols),
        BodyView::Text { lines, gutter } => render_text_lines(row, lines, *gutter, theme, cols),
        BodyView::Unavailable { message } => {
            position_cursor(row + 1, 3);
            print!("{}", Theme::fg(&theme.colors.status_warn_fg));
            print!("{}", fit(message, cols.saturating_sub(4)));
            print!("{}", Theme::reset());
            row + 2
        }
    }
}

fn render_bottom(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let border_row = rows.saturating_sub(1);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(rows, &vm.footer, theme, cols);
}

/// Renders the normal mode layout (no search bar).
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Info line]
/// [Body]
/// [Border]
/// [Footer]
/// ```
///
/// # Line Accounting
///
/// Reserves 6 lines for chrome (blank, header, border, info, border, footer).
pub fn render_normal_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_info_line(current_row, &vm.info, theme, cols);
    let _current_row = render_body(current_row, &vm.body, theme, cols);

    render_bottom(vm, theme, cols, rows);
}

/// Renders the search mode layout (with search bar).
///
/// Layout structure:
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Info line]
/// [Search Bar - 3 lines]
/// [Body]
/// [Border]
/// [Footer]
/// ```
///
/// # Line Accounting
///
/// Reserves 9 lines for chrome (the normal 6 plus the 3-line search bar).
pub fn render_search_mode(
    vm: &UIViewModel,
    search: &SearchBarInfo,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_info_line(current_row, &vm.info, theme, cols);
    current_row = render_search_bar(current_row, search, theme, cols);
    let _current_row = render_body(current_row, &vm.body, theme, cols);

    render_bottom(vm, theme, cols, rows);
}
