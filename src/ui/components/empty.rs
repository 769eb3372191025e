//! Empty state component renderer.
//!
//! This module renders the message displayed while no document is loaded.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;
use crate::ui::helpers::{fit, position_cursor, width};

/// Renders the empty state message.
///
/// Displays a centered two-line message until the first document arrives,
/// either from `document_path` or through a pipe.
///
/// # Parameters
///
/// * `empty` - Empty state information (message and subtitle)
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Layout
///
/// ```text
/// [5 blank lines]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// Both lines are horizontally centered. The message uses the `empty_state_fg`
/// theme color, and the subtitle uses `text_dim` with dim styling. The message
/// is positioned starting at row 6, with the subtitle at row 7.
///
/// # Example
///
/// ```text
/// [5 blank lines]
///                         No document loaded
///     Set document_path or run: zellij pipe --name jsonscope -- '<json>'
/// ```
pub fn render_empty_state(empty: &EmptyState, theme: &Theme, cols: usize) {
    let message = fit(&empty.message, cols);
    let msg_len = width(&message);
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    position_cursor(6, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{message}");
    print!("{}", " ".repeat(cols.saturating_sub(msg_padding + msg_len)));
    print!("{}", Theme::reset());

    let subtitle = fit(&empty.subtitle, cols);
    let sub_len = width(&subtitle);
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    position_cursor(7, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(sub_padding));
    print!("{subtitle}");
    print!("{}", " ".repeat(cols.saturating_sub(sub_padding + sub_len)));
    print!("{}", Theme::reset());
}
