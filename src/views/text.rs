//! Flat pretty-printed presentation of the document.
//!
//! Highlighting is an overlay: markers are byte ranges into the printed text,
//! recomputed from scratch for every render and every query. The text itself
//! is never touched, so marking the same text twice gives the same result.

use super::pretty::{pretty_print, PrettyText};
use super::{LocateOutcome, ViewRenderer};
use crate::domain::{JsonPath, Result};
use crate::search::{MatchKind, MatchSet};
use regex::RegexBuilder;
use serde_json::Value;
use std::ops::Range;

/// A highlighted region of the printed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMarker {
    pub range: Range<usize>,
    pub current: bool,
}

/// Text view state: printed document, markers and scroll focus.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    printed: Option<PrettyText>,
    markers: Vec<Range<usize>>,
    current: Option<Range<usize>>,
    focus_line: usize,
}

impl TextRenderer {
    #[must_use]
    pub const fn printed(&self) -> Option<&PrettyText> {
        self.printed.as_ref()
    }

    /// Occurrence ranges of the query, in text order.
    #[must_use]
    pub fn markers(&self) -> &[Range<usize>] {
        &self.markers
    }

    /// Range flagged as the current match.
    #[must_use]
    pub fn current_range(&self) -> Option<&Range<usize>> {
        self.current.as_ref()
    }

    /// Markers overlapping `window`, clipped to it and made relative to its
    /// start. The current range is included even when it is not one of the
    /// occurrences.
    #[must_use]
    pub fn markers_in(&self, window: &Range<usize>) -> Vec<TextMarker> {
        let clip = |range: &Range<usize>| {
            let start = range.start.max(window.start);
            let end = range.end.min(window.end);
            (start < end).then(|| (start - window.start)..(end - window.start))
        };

        let mut found: Vec<TextMarker> = self
            .markers
            .iter()
            .filter(|range| self.current.as_ref() != Some(*range))
            .filter_map(|range| clip(range).map(|range| TextMarker { range, current: false }))
            .collect();
        if let Some(range) = self.current.as_ref().and_then(|range| clip(range)) {
            found.push(TextMarker { range, current: true });
        }
        found.sort_by_key(|marker| marker.range.start);
        found
    }

    /// Line kept in the middle of the viewport.
    #[must_use]
    pub const fn focus_line(&self) -> usize {
        self.focus_line
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.printed.as_ref().map_or(0, PrettyText::line_count)
    }

    /// Moves the focus line by `lines`, clamped to the text.
    pub fn scroll(&mut self, lines: usize, down: bool) {
        let last = self.line_count().saturating_sub(1);
        self.focus_line = if down {
            self.focus_line.saturating_add(lines).min(last)
        } else {
            self.focus_line.saturating_sub(lines)
        };
    }
}

impl ViewRenderer for TextRenderer {
    fn render(&mut self, document: &Value) -> Result<()> {
        let _span = tracing::debug_span!("text_render").entered();

        let printed = pretty_print(document);
        tracing::debug!(bytes = printed.text().len(), lines = printed.line_count(), "text rendered");

        self.focus_line = self.focus_line.min(printed.line_count().saturating_sub(1));
        self.printed = Some(printed);
        self.clear_marks();
        Ok(())
    }

    fn mark_matches(&mut self, matches: &MatchSet) {
        self.markers.clear();
        let Some(printed) = &self.printed else {
            return;
        };
        if matches.query().is_empty() {
            return;
        }

        let pattern = RegexBuilder::new(&regex::escape(matches.query()))
            .case_insensitive(true)
            .build();
        match pattern {
            Ok(pattern) => {
                self.markers = pattern
                    .find_iter(printed.text())
                    .map(|found| found.range())
                    .collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not build occurrence pattern");
            }
        }
    }

    fn locate(&mut self, path: &JsonPath, kind: MatchKind) -> LocateOutcome {
        let Some(printed) = &self.printed else {
            return LocateOutcome::Unavailable;
        };
        let Some(span) = printed.span(path) else {
            tracing::debug!(path = %path, "path not present in text");
            return LocateOutcome::Unresolved;
        };

        let region = match kind {
            MatchKind::Key => span.key.clone().unwrap_or_else(|| span.value.clone()),
            MatchKind::Value => span.value.clone(),
        };
        let current = self
            .markers
            .iter()
            .find(|range| range.start >= region.start && range.end <= region.end)
            .cloned()
            .unwrap_or(region);

        self.focus_line = printed.line_of(current.start);
        self.current = Some(current);
        LocateOutcome::Located
    }

    fn clear_marks(&mut self) {
        self.markers.clear();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.printed.is_some()
    }
}
