//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of everything the engine knows: the
//! document store, the query and its debounce, the highlight controller, both
//! renderers and the active view mode. There is no other mutable state.
//!
//! # Example
//!
//! ```
//! use jsonscope::app::AppState;
//! use jsonscope::domain::DocumentSource;
//! use jsonscope::ui::Theme;
//! use jsonscope::Config;
//! use serde_json::json;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! state.set_document(json!({"apple": 1}), DocumentSource::Pipe { name: "jsonscope".into() });
//! state.search_query = "app".to_string();
//! state.run_search();
//!
//! assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.empty_state.is_none());
//! ```

use super::highlight::{HighlightController, HighlightState};
use super::modes::{InputMode, SearchFocus, ViewMode};
use crate::domain::{DocumentSource, DocumentStore};
use crate::infrastructure::display_path;
use crate::search::{build_match_set, Debouncer, Direction};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BodyView, EmptyState, FooterInfo, HeaderInfo, InfoLine, SearchBarInfo, Segment, SegmentStyle,
    TabInfo, TextLine, TreeRow, UIViewModel,
};
use crate::views::pretty::PrettyText;
use crate::views::{LocateOutcome, TextMarker, TextRenderer, TreeRenderer, ViewRenderer};
use crate::Config;
use serde_json::Value;
use std::ops::Range;
use std::time::Duration;

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warn,
    Error,
}

/// Message shown in the status line until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: MessageLevel,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), level: MessageLevel::Info }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self { text: text.into(), level: MessageLevel::Warn }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), level: MessageLevel::Error }
    }
}

/// Picks the renderer for `mode` out of the two owned by the state.
fn view_for<'a>(
    mode: ViewMode,
    tree: &'a mut TreeRenderer,
    text: &'a mut TextRenderer,
) -> &'a mut dyn ViewRenderer {
    match mode {
        ViewMode::Tree => tree,
        ViewMode::Text => text,
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The current document and its revision.
    pub document: DocumentStore,

    /// File the worker (re)loads on start-up, `r` and filesystem changes.
    pub document_path: Option<String>,

    /// Raw query as typed. Trimmed by the indexer, not here.
    pub search_query: String,

    pub input_mode: InputMode,

    /// Which presentation is drawn and receives highlights.
    pub view_mode: ViewMode,

    pub highlight: HighlightController,
    pub tree: TreeRenderer,
    pub text: TextRenderer,
    pub debounce: Debouncer,

    /// Latest status line message.
    pub status: Option<StatusMessage>,

    pub theme: Theme,

    /// Number of indexer passes run so far.
    pub search_runs: u64,

    /// Body height from the last render, used as the page size.
    body_rows: usize,
}

impl AppState {
    /// Creates an empty engine configured from plugin options.
    ///
    /// # Parameters
    ///
    /// * `config` - Parsed plugin options
    /// * `theme` - Color scheme for UI rendering
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self {
            document: DocumentStore::default(),
            document_path: config.document_path.clone(),
            search_query: String::new(),
            input_mode: InputMode::Normal,
            view_mode: config.default_view,
            highlight: HighlightController::default(),
            tree: TreeRenderer::new(config.tree_expand_depth, config.max_tree_nodes),
            text: TextRenderer::default(),
            debounce: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            status: None,
            theme,
            search_runs: 0,
            body_rows: 20,
        }
    }

    /// Replaces the current document and invalidates everything derived from
    /// the old one.
    ///
    /// The pending search is cancelled, highlights are removed from both
    /// views, the tree layout returns to its defaults and the active view is
    /// rendered from the new document. The query text is kept.
    pub fn set_document(&mut self, document: Value, source: DocumentSource) {
        let _span = tracing::debug_span!("set_document", source = %source).entered();

        self.debounce.cancel();
        self.highlight.clear(&mut [&mut self.tree, &mut self.text]);
        self.status = None;

        let revision = self.document.set(document, source);
        self.tree.reset_layout();
        self.render_active();

        tracing::debug!(revision, "document replaced");
    }

    /// Re-renders the active view from the current document.
    ///
    /// A renderer failure is reported in the status line; the engine stays
    /// usable.
    pub fn render_active(&mut self) {
        let Some(document) = self.document.get() else {
            return;
        };
        let view = view_for(self.view_mode, &mut self.tree, &mut self.text);
        if let Err(e) = view.render(document) {
            tracing::warn!(view = self.view_mode.label(), error = %e, "render failed");
            self.status = Some(StatusMessage::warn(format!("{e}. Press c for the text view.")));
        }
    }

    /// Marks a search as pending and returns the delay of the timer to arm.
    pub fn schedule_search(&mut self) -> Duration {
        self.debounce.schedule()
    }

    /// Accounts for one fired debounce timer; runs the search once the query
    /// has settled.
    ///
    /// Returns `true` when a search ran.
    pub fn on_debounce_timer(&mut self) -> bool {
        if self.debounce.on_timer() {
            self.run_search();
            true
        } else {
            false
        }
    }

    /// Indexes the current document for the current query and highlights the
    /// first match in the active view.
    pub fn run_search(&mut self) {
        let _span = tracing::debug_span!("run_search", query = %self.search_query).entered();

        self.debounce.cancel();
        self.status = None;

        let revision = self.document.revision();
        let Some(document) = self.document.get() else {
            tracing::debug!("no document to search");
            return;
        };
        let matches = build_match_set(document, &self.search_query, revision);
        self.search_runs += 1;

        let found = matches.len();
        let view = view_for(self.view_mode, &mut self.tree, &mut self.text);
        let outcome = self.highlight.apply(matches, revision, view);
        self.report(outcome);

        if found == 0 && !self.search_query.trim().is_empty() {
            self.status = Some(StatusMessage::info(format!(
                "No matches for \"{}\"",
                self.search_query.trim()
            )));
        }
        tracing::debug!(matches = found, runs = self.search_runs, "search applied");
    }

    /// Steps to the next or previous match.
    ///
    /// Returns `false` when there is nothing to navigate.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.highlight.state() != HighlightState::Highlighted {
            return false;
        }
        let revision = self.document.revision();
        let view = view_for(self.view_mode, &mut self.tree, &mut self.text);
        let outcome = self.highlight.navigate(direction, revision, view);
        self.report(outcome);
        true
    }

    /// Cancels the pending search, empties the query and removes every mark.
    pub fn clear_search(&mut self) {
        self.debounce.cancel();
        self.highlight.clear(&mut [&mut self.tree, &mut self.text]);
        self.search_query.clear();
        self.status = None;
    }

    /// Makes `mode` the active view, re-rendering it and moving the highlight
    /// over without re-running the search.
    ///
    /// Returns `false` if `mode` was already active.
    pub fn switch_view(&mut self, mode: ViewMode) -> bool {
        if mode == self.view_mode {
            return false;
        }
        let _span = tracing::debug_span!("switch_view", to = mode.label()).entered();

        view_for(self.view_mode, &mut self.tree, &mut self.text).clear_marks();
        self.view_mode = mode;
        self.status = None;
        self.render_active();

        let revision = self.document.revision();
        let view = view_for(self.view_mode, &mut self.tree, &mut self.text);
        let outcome = self.highlight.reapply(revision, view);
        self.report(outcome);
        true
    }

    /// `"{current}/{total}"`, hidden when nothing is highlighted.
    #[must_use]
    pub fn result_indicator(&self) -> Option<String> {
        self.highlight.indicator()
    }

    fn report(&mut self, outcome: Option<LocateOutcome>) {
        match outcome {
            Some(LocateOutcome::Unresolved) => {
                self.status = Some(StatusMessage::warn(
                    "Match no longer present in the document; highlights cleared",
                ));
            }
            Some(LocateOutcome::Unavailable) => {
                let reason = self.tree.failure().unwrap_or("view not rendered");
                self.status = Some(StatusMessage::warn(format!(
                    "{} view unavailable ({reason}). Press c for the text view.",
                    self.view_mode.label()
                )));
            }
            Some(LocateOutcome::Located) | None => {}
        }
    }

    /// Moves the selection (tree) or scrolls (text) by one row.
    pub fn move_down(&mut self) {
        match self.view_mode {
            ViewMode::Tree => self.tree.move_selection_down(),
            ViewMode::Text => self.text.scroll(1, true),
        }
    }

    pub fn move_up(&mut self) {
        match self.view_mode {
            ViewMode::Tree => self.tree.move_selection_up(),
            ViewMode::Text => self.text.scroll(1, false),
        }
    }

    /// Moves by one body height.
    pub fn page(&mut self, down: bool) {
        let amount = self.body_rows.saturating_sub(1).max(1);
        match self.view_mode {
            ViewMode::Tree => self.tree.page(amount, down),
            ViewMode::Text => self.text.scroll(amount, down),
        }
    }

    /// Records the terminal height so paging moves by a full body.
    pub fn set_viewport(&mut self, rows: usize) {
        self.body_rows = self.calculate_available_rows(rows);
    }

    /// Computes a renderable view model for a `rows` × `cols` pane.
    ///
    /// The body window is centered on the tree selection or the text focus
    /// line, and pulled back near the ends so the pane stays full.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let empty_state = self.document.get().is_none().then(|| EmptyState {
            message: "No document loaded".to_string(),
            subtitle: "Set document_path or run: zellij pipe --name jsonscope -- '<json>'".to_string(),
        });

        let available = self.calculate_available_rows(rows);
        let body = match (&empty_state, self.view_mode) {
            (Some(_), _) => BodyView::Text { lines: vec![], gutter: 1 },
            (None, ViewMode::Tree) => self.compute_tree_body(available),
            (None, ViewMode::Text) => self.compute_text_body(available),
        };

        UIViewModel {
            header: self.compute_header(cols),
            info: self.compute_info_line(),
            search_bar: self.compute_search_bar(),
            body,
            footer: self.compute_footer(),
            empty_state,
        }
    }

    fn compute_tree_body(&self, available: usize) -> BodyView {
        if let Some(reason) = self.tree.failure() {
            return BodyView::Unavailable {
                message: format!("Tree view unavailable: {reason}. Press c for the text view."),
            };
        }

        let visible = self.tree.visible_rows();
        let selected = self.tree.selected();
        let position = visible.iter().position(|&id| id == selected).unwrap_or(0);
        let current = self.tree.current();

        let rows = visible[window(position, visible.len(), available)]
            .iter()
            .filter_map(|&id| {
                let node = self.tree.node(id)?;
                let glyph = if !node.kind.is_container() || node.child_count == 0 {
                    ' '
                } else if self.tree.is_expanded(id) {
                    '▾'
                } else {
                    '▸'
                };
                Some(TreeRow {
                    depth: node.depth,
                    glyph,
                    label: node.label.clone(),
                    preview: node.preview.clone(),
                    kind: node.kind,
                    is_selected: id == selected,
                    is_marked: self.tree.is_marked(id),
                    current: current.filter(|(target, _)| *target == id).map(|(_, kind)| kind),
                })
            })
            .collect();

        BodyView::Tree { rows }
    }

    fn compute_text_body(&self, available: usize) -> BodyView {
        let Some(printed) = self.text.printed() else {
            return BodyView::Unavailable {
                message: "Text view not rendered".to_string(),
            };
        };

        let total = printed.line_count();
        let focus = self.text.focus_line();
        let lines = window(focus, total, available)
            .filter_map(|line| {
                let range = printed.line_range(line)?;
                let markers = self.text.markers_in(&range);
                Some(TextLine {
                    number: line + 1,
                    segments: line_segments(printed, &range, &markers),
                    is_focus: line == focus,
                })
            })
            .collect();

        BodyView::Text {
            lines,
            gutter: total.to_string().len(),
        }
    }

    fn compute_header(&self, cols: usize) -> HeaderInfo {
        let source = self.document.source().map(|source| match source {
            DocumentSource::File { path } => display_path(path, cols / 2),
            DocumentSource::Pipe { .. } => source.to_string(),
        });
        let received = self
            .document
            .received_at()
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|at| at.format("%H:%M:%S UTC").to_string());

        HeaderInfo {
            title: " jsonscope ".to_string(),
            source,
            received,
            tabs: ViewMode::ALL
                .iter()
                .map(|&mode| TabInfo {
                    label: mode.label(),
                    active: mode == self.view_mode,
                })
                .collect(),
            indicator: self.result_indicator(),
        }
    }

    fn compute_info_line(&self) -> InfoLine {
        if let Some(status) = &self.status {
            return InfoLine {
                text: status.text.clone(),
                level: Some(status.level),
            };
        }

        let path = match (self.highlight.cursor().current(), self.view_mode) {
            (Some(current), _) => Some(&current.path),
            (None, ViewMode::Tree) => self.tree.selected_node().map(|node| &node.path),
            (None, ViewMode::Text) => None,
        };
        // Root has the empty pointer; show the path alone.
        let text = match path {
            Some(path) if path.is_root() => path.to_string(),
            Some(path) => format!("{path}  {}", path.to_pointer()),
            None => String::new(),
        };
        InfoLine { text, level: None }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Search(SearchFocus::Typing), _) => {
                "ESC: exit search  Enter/Ctrl+n: next  Ctrl+p: prev  Tab: results  Type to search"
            }
            (InputMode::Search(SearchFocus::Navigating), _) => {
                "ESC: exit search  /: edit query  n/j: next  N/k: prev  Enter: close box  t/c: view"
            }
            (InputMode::Normal, ViewMode::Tree) => {
                "j/k: move  Enter: toggle  E/C: expand/collapse all  /: search  n/N: match  c: text  r: reload  q: quit"
            }
            (InputMode::Normal, ViewMode::Text) => {
                "j/k: scroll  PgUp/PgDn: page  /: search  n/N: match  t: tree  r: reload  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                indicator: self.result_indicator(),
                pending: self.debounce.is_pending(),
                focused: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }

    /// Rows left for the body once header, info line, borders, footer and
    /// (in search mode) the 3-line search box are drawn.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(6),
            InputMode::Search(_) => total_rows.saturating_sub(9),
        }
    }
}

/// Index range of `available` items out of `total` with `selected` kept near
/// the middle.
fn window(selected: usize, total: usize, available: usize) -> Range<usize> {
    let mut start = selected.saturating_sub(available / 2);
    let end = (start + available).min(total);
    if end - start < available && total >= available {
        start = end.saturating_sub(available);
    }
    start..end
}

/// Splits one printed line into styled segments.
///
/// Current match wins over match, match over syntax colour. `markers` are
/// relative to the start of `line`.
fn line_segments(printed: &PrettyText, line: &Range<usize>, markers: &[TextMarker]) -> Vec<Segment> {
    let text = &printed.text()[line.clone()];
    let tokens = printed.tokens();
    let first = tokens.partition_point(|(range, _)| range.end <= line.start);
    let local: Vec<_> = tokens[first..]
        .iter()
        .take_while(|(range, _)| range.start < line.end)
        .map(|(range, kind)| {
            let start = range.start.max(line.start) - line.start;
            let end = range.end.min(line.end) - line.start;
            (start..end, *kind)
        })
        .collect();

    let mut cuts = vec![0, text.len()];
    cuts.extend(local.iter().flat_map(|(range, _)| [range.start, range.end]));
    cuts.extend(markers.iter().flat_map(|marker| [marker.range.start, marker.range.end]));
    cuts.sort_unstable();
    cuts.dedup();

    cuts.windows(2)
        .filter(|pair| pair[0] < pair[1])
        .map(|pair| {
            let at = pair[0];
            let covers = |range: &Range<usize>| range.start <= at && at < range.end;
            let style = if markers.iter().any(|m| m.current && covers(&m.range)) {
                SegmentStyle::CurrentMatch
            } else if markers.iter().any(|m| covers(&m.range)) {
                SegmentStyle::Match
            } else if let Some((_, kind)) = local.iter().find(|(range, _)| covers(range)) {
                SegmentStyle::Token(*kind)
            } else {
                SegmentStyle::Punctuation
            };
            Segment {
                text: text[pair[0]..pair[1]].to_string(),
                style,
            }
        })
        .collect()
}
