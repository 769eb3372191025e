//! The `{Cleared, Highlighted}` state machine tying the cursor to a view.
//!
//! The controller owns the [`Cursor`] and talks to whichever renderer is
//! active through [`ViewRenderer`]. It never decides which view that is; the
//! caller passes it in on every operation.

use crate::search::{Cursor, Direction, MatchSet};
use crate::views::{LocateOutcome, ViewRenderer};

/// Whether marks are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Cleared,
    Highlighted,
}

/// Owner of the cursor and of the marks in the active view.
///
/// # Example
///
/// ```
/// use jsonscope::app::highlight::{HighlightController, HighlightState};
/// use jsonscope::search::{build_match_set, Direction};
/// use jsonscope::views::{TextRenderer, ViewRenderer};
/// use serde_json::json;
///
/// let doc = json!({"a": "hello world", "b": {"c": "HELLO"}});
/// let mut view = TextRenderer::default();
/// view.render(&doc).unwrap();
///
/// let mut highlight = HighlightController::default();
/// highlight.apply(build_match_set(&doc, "hello", 1), 1, &mut view);
/// assert_eq!(highlight.state(), HighlightState::Highlighted);
///
/// highlight.navigate(Direction::Next, 1, &mut view);
/// assert_eq!(highlight.indicator().as_deref(), Some("2/2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HighlightController {
    state: HighlightState,
    cursor: Cursor,
}

impl HighlightController {
    #[must_use]
    pub const fn state(&self) -> HighlightState {
        self.state
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Result indicator, shown only while highlighted.
    #[must_use]
    pub fn indicator(&self) -> Option<String> {
        match self.state {
            HighlightState::Highlighted => self.cursor.indicator(),
            HighlightState::Cleared => None,
        }
    }

    /// Installs a freshly built match set and highlights its first match.
    ///
    /// # Parameters
    ///
    /// * `matches` - Result of the latest search pass
    /// * `revision` - Revision of the document currently held by the store
    /// * `view` - The active renderer
    ///
    /// # Returns
    ///
    /// The locate outcome for the first match, or `None` when nothing was
    /// located (empty or stale set).
    pub fn apply(
        &mut self,
        matches: MatchSet,
        revision: u64,
        view: &mut dyn ViewRenderer,
    ) -> Option<LocateOutcome> {
        view.clear_marks();

        if matches.revision() != revision {
            tracing::warn!(
                built_for = matches.revision(),
                current = revision,
                "discarding match set built for a replaced document"
            );
            self.reset();
            return None;
        }

        self.cursor.reset(matches);
        if self.cursor.matches().is_empty() {
            self.state = HighlightState::Cleared;
            return None;
        }

        self.state = HighlightState::Highlighted;
        view.mark_matches(self.cursor.matches());
        Some(self.locate_current(view))
    }

    /// Moves the cursor one step and locates the new current match.
    ///
    /// No-op unless highlighted.
    pub fn navigate(
        &mut self,
        direction: Direction,
        revision: u64,
        view: &mut dyn ViewRenderer,
    ) -> Option<LocateOutcome> {
        if self.state != HighlightState::Highlighted {
            return None;
        }
        if self.cursor.matches().revision() != revision {
            view.clear_marks();
            self.reset();
            return None;
        }

        self.cursor.step(direction);
        tracing::debug!(index = ?self.cursor.index(), ?direction, "cursor moved");
        Some(self.locate_current(view))
    }

    /// Re-marks `view` and re-locates the unchanged cursor position.
    ///
    /// Used after the active view changed or was re-rendered.
    pub fn reapply(&mut self, revision: u64, view: &mut dyn ViewRenderer) -> Option<LocateOutcome> {
        view.clear_marks();
        if self.state != HighlightState::Highlighted {
            return None;
        }
        if self.cursor.matches().revision() != revision {
            self.reset();
            return None;
        }

        view.mark_matches(self.cursor.matches());
        Some(self.locate_current(view))
    }

    /// Drops the cursor and removes every mark from `views`.
    pub fn clear(&mut self, views: &mut [&mut dyn ViewRenderer]) {
        for view in views.iter_mut() {
            view.clear_marks();
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.cursor.clear();
        self.state = HighlightState::Cleared;
    }

    fn locate_current(&mut self, view: &mut dyn ViewRenderer) -> LocateOutcome {
        let Some(current) = self.cursor.current() else {
            return LocateOutcome::Unresolved;
        };
        let (path, kind) = (current.path.clone(), current.kind);

        let outcome = view.locate(&path, kind);
        match outcome {
            LocateOutcome::Located => {}
            LocateOutcome::Unresolved => {
                tracing::warn!(path = %path, "current match no longer resolves, clearing highlights");
                view.clear_marks();
                self.reset();
            }
            LocateOutcome::Unavailable => {
                tracing::debug!(path = %path, "active view unavailable, keeping cursor");
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JsonPath;
    use crate::search::build_match_set;
    use crate::views::{TextRenderer, TreeRenderer};
    use serde_json::{json, Value};

    fn sample() -> Value {
        json!({"a": "hello world", "b": {"c": "HELLO"}})
    }

    fn tree_for(doc: &Value) -> TreeRenderer {
        let mut tree = TreeRenderer::default();
        tree.render(doc).unwrap();
        tree
    }

    #[test]
    fn apply_highlights_first_match() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut highlight = HighlightController::default();

        let outcome = highlight.apply(build_match_set(&doc, "hello", 1), 1, &mut tree);

        assert_eq!(outcome, Some(LocateOutcome::Located));
        assert_eq!(highlight.state(), HighlightState::Highlighted);
        assert_eq!(highlight.indicator().as_deref(), Some("1/2"));
        let current = tree.current().map(|(id, _)| tree.node(id).unwrap().path.clone());
        assert_eq!(current, Some(JsonPath::root().child_key("a")));
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut highlight = HighlightController::default();
        let _ = highlight.apply(build_match_set(&doc, "hello", 1), 1, &mut tree);

        let mut seen = vec![];
        for direction in [Direction::Next, Direction::Next, Direction::Prev] {
            let _ = highlight.navigate(direction, 1, &mut tree);
            seen.push(highlight.indicator().unwrap_or_default());
        }
        assert_eq!(seen, vec!["2/2", "1/2", "2/2"]);
    }

    #[test]
    fn empty_set_leaves_controller_cleared() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut highlight = HighlightController::default();

        assert_eq!(highlight.apply(build_match_set(&doc, "zzz", 1), 1, &mut tree), None);
        assert_eq!(highlight.state(), HighlightState::Cleared);
        assert!(highlight.indicator().is_none());
        assert_eq!(highlight.navigate(Direction::Next, 1, &mut tree), None);
    }

    #[test]
    fn stale_revision_is_never_located() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut highlight = HighlightController::default();

        assert_eq!(highlight.apply(build_match_set(&doc, "hello", 1), 2, &mut tree), None);
        assert_eq!(highlight.state(), HighlightState::Cleared);
        assert!(tree.current().is_none());
    }

    #[test]
    fn unresolved_locate_clears_everything() {
        let doc = sample();
        let matches = build_match_set(&doc, "hello", 1);
        let mut tree = tree_for(&json!({"other": 1}));
        let mut highlight = HighlightController::default();

        let outcome = highlight.apply(matches, 1, &mut tree);

        assert_eq!(outcome, Some(LocateOutcome::Unresolved));
        assert_eq!(highlight.state(), HighlightState::Cleared);
        assert!(highlight.cursor().current().is_none());
        assert!((0..tree.node_count()).all(|id| !tree.is_marked(id)));
    }

    #[test]
    fn unavailable_view_keeps_cursor() {
        let doc = sample();
        let mut broken = TreeRenderer::new(1, 2);
        assert!(broken.render(&doc).is_err());
        let mut highlight = HighlightController::default();

        let outcome = highlight.apply(build_match_set(&doc, "hello", 1), 1, &mut broken);

        assert_eq!(outcome, Some(LocateOutcome::Unavailable));
        assert_eq!(highlight.state(), HighlightState::Highlighted);
        assert_eq!(highlight.indicator().as_deref(), Some("1/2"));
    }

    #[test]
    fn reapply_moves_highlight_to_another_view() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut text = TextRenderer::default();
        text.render(&doc).unwrap();
        let mut highlight = HighlightController::default();
        let _ = highlight.apply(build_match_set(&doc, "hello", 1), 1, &mut tree);
        let _ = highlight.navigate(Direction::Next, 1, &mut tree);

        tree.clear_marks();
        let outcome = highlight.reapply(1, &mut text);

        assert_eq!(outcome, Some(LocateOutcome::Located));
        assert_eq!(highlight.indicator().as_deref(), Some("2/2"));
        let current = text.current_range().cloned().unwrap();
        assert_eq!(&text.printed().unwrap().text()[current], "HELLO");
    }

    #[test]
    fn clear_removes_marks_from_every_view() {
        let doc = sample();
        let mut tree = tree_for(&doc);
        let mut text = TextRenderer::default();
        text.render(&doc).unwrap();
        let mut highlight = HighlightController::default();
        let matches = build_match_set(&doc, "hello", 1);
        text.mark_matches(&matches);
        let _ = highlight.apply(matches, 1, &mut tree);

        highlight.clear(&mut [&mut tree, &mut text]);

        assert_eq!(highlight.state(), HighlightState::Cleared);
        assert!(tree.current().is_none());
        assert!(text.markers().is_empty());
    }
}
