//! The two interchangeable presentations of the current document.
//!
//! Both renderers implement [`ViewRenderer`]. The highlight controller only
//! talks to them through this trait, so it does not care which one is active.
//!
//! - [`tree`]: collapsible hierarchy with a path → node index
//! - [`text`]: pretty-printed text with an offset-based marker overlay
//! - [`pretty`]: the span-tracking printer behind the text view

pub mod pretty;
pub mod text;
pub mod tree;

pub use text::{TextMarker, TextRenderer};
pub use tree::{NodeKind, TreeNode, TreeRenderer};

use crate::domain::{JsonPath, Result};
use crate::search::{MatchKind, MatchSet};
use serde_json::Value;

/// Result of asking a renderer to bring a node into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LocateOutcome {
    /// The node is visible and flagged as the current match.
    Located,
    /// The path does not resolve against the rendered document.
    Unresolved,
    /// The renderer failed to initialise and shows nothing.
    Unavailable,
}

/// Rendering contract shared by the tree and text views.
pub trait ViewRenderer {
    /// Rebuilds the presentation of `document` from scratch.
    ///
    /// Calling it twice with the same document yields the same visible state.
    /// All marks are dropped and must be re-applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the presentation cannot be built; the renderer is
    /// then empty and answers [`LocateOutcome::Unavailable`].
    fn render(&mut self, document: &Value) -> Result<()>;

    /// Flags every match in `matches` as a non-current mark.
    fn mark_matches(&mut self, matches: &MatchSet);

    /// Makes the node at `path` visible and flags it as the current match.
    ///
    /// `kind` selects the key or the value of an object member.
    fn locate(&mut self, path: &JsonPath, kind: MatchKind) -> LocateOutcome;

    /// Removes every mark, current or not.
    fn clear_marks(&mut self);

    /// `true` once a render succeeded.
    fn is_ready(&self) -> bool;
}
