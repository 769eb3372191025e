//! Cyclic navigation over a [`MatchSet`].

use super::indexer::{Match, MatchSet};

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Position of the "current" match within a [`MatchSet`].
///
/// Invariant: `index` is `Some(i)` with `i < matches.len()` when the set is
/// non-empty, and `None` when it is empty. Steps wrap modulo the length.
///
/// # Example
///
/// ```
/// use jsonscope::search::{build_match_set, Cursor};
/// use serde_json::json;
///
/// let doc = json!({"a": "hello world", "b": {"c": "HELLO"}});
/// let mut cursor = Cursor::default();
/// cursor.reset(build_match_set(&doc, "hello", 1));
///
/// assert_eq!(cursor.indicator().as_deref(), Some("1/2"));
/// cursor.next();
/// assert_eq!(cursor.indicator().as_deref(), Some("2/2"));
/// cursor.next();
/// assert_eq!(cursor.indicator().as_deref(), Some("1/2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    matches: MatchSet,
    index: Option<usize>,
}

impl Cursor {
    /// Installs a new match set and points at its first match.
    pub fn reset(&mut self, matches: MatchSet) {
        self.index = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
    }

    /// Drops the match set.
    pub fn clear(&mut self) {
        self.reset(MatchSet::empty());
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.step(Direction::Next);
    }

    pub fn prev(&mut self) {
        self.step(Direction::Prev);
    }

    /// Moves one match in `direction`, wrapping at either end.
    ///
    /// No-op on an empty set.
    pub fn step(&mut self, direction: Direction) {
        let len = self.matches.len();
        let Some(index) = self.index else {
            return;
        };
        self.index = Some(match direction {
            Direction::Next => (index + 1) % len,
            Direction::Prev => (index + len - 1) % len,
        });
    }

    #[must_use]
    pub fn current(&self) -> Option<&Match> {
        self.index.and_then(|i| self.matches.get(i))
    }

    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub const fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// `"{position}/{total}"` with a 1-based position, or `None` when there
    /// is nothing to show.
    #[must_use]
    pub fn indicator(&self) -> Option<String> {
        self.index
            .map(|i| format!("{}/{}", i + 1, self.matches.len()))
    }
}
