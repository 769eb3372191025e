//! View model types representing renderable UI state.
//!
//! View models are computed from application state via
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! logic, only display-ready data: the body is already windowed to the pane
//! height and text lines are already split into styled segments.
//!
//! # Example
//!
//! ```rust
//! use jsonscope::ui::viewmodel::{Segment, SegmentStyle, TextLine};
//!
//! let line = TextLine {
//!     number: 2,
//!     is_focus: true,
//!     segments: vec![
//!         Segment { text: "  ".to_string(), style: SegmentStyle::Punctuation },
//!         Segment { text: "\"hello\"".to_string(), style: SegmentStyle::Match },
//!     ],
//! };
//! assert_eq!(line.segments.len(), 2);
//! ```

use crate::app::state::MessageLevel;
use crate::search::MatchKind;
use crate::views::pretty::TokenKind;
use crate::views::NodeKind;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Title, document source and view tabs.
    pub header: HeaderInfo,

    /// Status message, or the path of the current match/selection.
    pub info: InfoLine,

    /// Optional search box (search mode only).
    pub search_bar: Option<SearchBarInfo>,

    /// Rows of the active view that fit the pane.
    pub body: BodyView,

    pub footer: FooterInfo,

    /// Shown instead of everything else while no document is loaded.
    pub empty_state: Option<EmptyState>,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,

    /// Where the current document came from, shortened for display.
    pub source: Option<String>,

    /// When the current document was received.
    pub received: Option<String>,

    /// One tab per view, exactly one of them active.
    pub tabs: Vec<TabInfo>,

    /// `"{current}/{total}"` while highlighted.
    pub indicator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub label: &'static str,
    pub active: bool,
}

/// Line under the header.
#[derive(Debug, Clone)]
pub struct InfoLine {
    pub text: String,

    /// `None` for the plain path breadcrumb.
    pub level: Option<MessageLevel>,
}

/// Body of the active view.
#[derive(Debug, Clone)]
pub enum BodyView {
    Tree {
        rows: Vec<TreeRow>,
    },
    Text {
        lines: Vec<TextLine>,
        /// Width of the line number column.
        gutter: usize,
    },
    /// The active view failed to render.
    Unavailable {
        message: String,
    },
}

/// One visible tree node.
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub depth: usize,

    /// `▾` expanded, `▸` collapsed, blank for scalars and empty containers.
    pub glyph: char,

    pub label: String,
    pub preview: String,
    pub kind: NodeKind,
    pub is_selected: bool,
    pub is_marked: bool,

    /// Set on the row holding the current match.
    pub current: Option<MatchKind>,
}

/// One visible line of pretty-printed text.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// One-based line number.
    pub number: usize,
    pub segments: Vec<Segment>,
    pub is_focus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Brackets, colons, commas and indentation.
    Punctuation,
    Token(TokenKind),
    Match,
    CurrentMatch,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Current search query text.
    pub query: String,

    /// `"{current}/{total}"` while highlighted.
    pub indicator: Option<String>,

    /// A keystroke is waiting for the debounce timer.
    pub pending: bool,

    /// Keystrokes go to the query (as opposed to match navigation).
    pub focused: bool,
}
