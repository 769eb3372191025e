//! Input and view mode state types.
//!
//! Input modes decide how key presses are interpreted:
//! - **Normal**: navigation of the active view and single-key commands
//! - **Search**: the query box is open, either being typed into or used to
//!   step through results
//!
//! The view mode decides which of the two presentations is drawn. Exactly one
//! is active at a time.
//!
//! # Example
//!
//! ```
//! use jsonscope::app::modes::{InputMode, SearchFocus, ViewMode};
//!
//! let input_mode = InputMode::Search(SearchFocus::Typing);
//! assert!(input_mode.is_search());
//! assert_eq!(ViewMode::Text.label(), "Text");
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Characters edit the query; every edit re-arms the debounce.
    Typing,

    /// The query is frozen; `n`/`N` and `j`/`k` step through matches.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search(SearchFocus),
}

impl InputMode {
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search(_))
    }
}

/// Which presentation of the document is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Collapsible hierarchy.
    #[default]
    Tree,
    /// Pretty-printed, syntax-coloured text.
    Text,
}

impl ViewMode {
    pub const ALL: [Self; 2] = [Self::Tree, Self::Text];

    /// Tab caption shown in the header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tree => "Tree",
            Self::Text => "Text",
        }
    }

    /// Parses the `default_view` plugin option.
    #[must_use]
    pub fn from_option(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Some(Self::Tree),
            "text" | "code" => Some(Self::Text),
            _ => None,
        }
    }
}
