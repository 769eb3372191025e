//! Collapsible tree presentation of the document.
//!
//! `render` flattens the document into a pre-order node table in which every
//! node knows its parent and where its subtree ends, and builds a
//! `JsonPath → node` index alongside it. Locating a match is then a hash
//! lookup followed by a walk up the parent links, which expands exactly the
//! ancestors of the target and nothing else.
//!
//! Expansion state is keyed by path, so it survives re-renders of the same
//! document; [`TreeRenderer::reset_layout`] restores the defaults when a new
//! document arrives.

use super::{LocateOutcome, ViewRenderer};
use crate::domain::{JsonPath, JsonScopeError, PathSegment, Result};
use crate::search::{MatchKind, MatchSet};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Containers shallower than this are expanded on first render.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

/// Above this many nodes the tree refuses to build.
pub const DEFAULT_MAX_NODES: usize = 200_000;

const PREVIEW_CHARS: usize = 120;

/// JSON type of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

/// One row of the flattened tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub path: JsonPath,
    /// Member name, array index, or `root`.
    pub label: String,
    pub kind: NodeKind,
    /// Short rendering of the value (`{…} 3 keys`, `"text"`, `42`).
    pub preview: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub child_count: usize,
    /// One past the last descendant in the node table.
    pub subtree_end: usize,
}

/// Truncates on a character boundary, appending `…` when shortened.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &s[..cut]),
        None => s.to_string(),
    }
}

fn describe(value: &Value) -> (String, usize) {
    match value {
        Value::Object(map) if map.is_empty() => ("{}".to_string(), 0),
        Value::Object(map) => (format!("{{…}} {} keys", map.len()), map.len()),
        Value::Array(items) if items.is_empty() => ("[]".to_string(), 0),
        Value::Array(items) => (format!("[…] {} items", items.len()), items.len()),
        Value::String(s) => (format!("\"{}\"", truncate(s, PREVIEW_CHARS)), 0),
        other => (other.to_string(), 0),
    }
}

fn label_for(path: &JsonPath) -> String {
    match path.last() {
        None => "root".to_string(),
        Some(PathSegment::Key(key)) => key.clone(),
        Some(PathSegment::Index(index)) => index.to_string(),
    }
}

/// Tree view state: node table, expansion, selection and marks.
#[derive(Debug, Clone)]
pub struct TreeRenderer {
    nodes: Vec<TreeNode>,
    index: HashMap<JsonPath, usize>,
    expanded: HashSet<JsonPath>,
    layout_seeded: bool,
    expand_depth: usize,
    max_nodes: usize,
    marked: HashSet<usize>,
    current: Option<(usize, MatchKind)>,
    selected: usize,
    failure: Option<String>,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_EXPAND_DEPTH, DEFAULT_MAX_NODES)
    }
}

impl TreeRenderer {
    /// Creates an empty tree.
    ///
    /// # Parameters
    ///
    /// * `expand_depth` - Containers shallower than this start expanded
    /// * `max_nodes` - Documents with more nodes make the tree unavailable
    #[must_use]
    pub fn new(expand_depth: usize, max_nodes: usize) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            expanded: HashSet::new(),
            layout_seeded: false,
            expand_depth,
            max_nodes,
            marked: HashSet::new(),
            current: None,
            selected: 0,
            failure: None,
        }
    }

    /// Forgets expansion and selection so the next render starts from the
    /// default layout.
    pub fn reset_layout(&mut self) {
        self.expanded.clear();
        self.layout_seeded = false;
        self.selected = 0;
    }

    /// Reason the last render failed, if it did.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    #[must_use]
    pub fn node(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_expanded(&self, id: usize) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| self.expanded.contains(&node.path))
    }

    #[must_use]
    pub fn is_marked(&self, id: usize) -> bool {
        self.marked.contains(&id)
    }

    /// The current match, as a node id and the part of the row it refers to.
    #[must_use]
    pub const fn current(&self) -> Option<(usize, MatchKind)> {
        self.current
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.nodes.get(self.selected)
    }

    /// Node ids of the rows currently visible, in display order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<usize> {
        let mut rows = Vec::new();
        let mut id = 0;
        while let Some(node) = self.nodes.get(id) {
            rows.push(id);
            id = if node.kind.is_container() && !self.expanded.contains(&node.path) {
                node.subtree_end
            } else {
                id + 1
            };
        }
        rows
    }

    /// Moves the selection to the next visible row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let position = rows.iter().position(|&id| id == self.selected).unwrap_or(0);
        self.selected = rows[(position + 1) % rows.len()];
    }

    /// Moves the selection to the previous visible row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let position = rows.iter().position(|&id| id == self.selected).unwrap_or(0);
        self.selected = rows[(position + rows.len() - 1) % rows.len()];
    }

    /// Moves the selection by `amount` visible rows without wrapping.
    pub fn page(&mut self, amount: usize, down: bool) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let position = rows.iter().position(|&id| id == self.selected).unwrap_or(0);
        let target = if down {
            (position + amount).min(rows.len() - 1)
        } else {
            position.saturating_sub(amount)
        };
        self.selected = rows[target];
    }

    /// Expands or collapses the selected container.
    ///
    /// Returns `false` when the selection is a scalar.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(node) = self.nodes.get(self.selected) else {
            return false;
        };
        if !node.kind.is_container() {
            return false;
        }
        if !self.expanded.remove(&node.path) {
            self.expanded.insert(node.path.clone());
        }
        true
    }

    pub fn expand_all(&mut self) {
        self.expanded = self
            .nodes
            .iter()
            .filter(|node| node.kind.is_container())
            .map(|node| node.path.clone())
            .collect();
    }

    /// Collapses everything below the root.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.expanded.insert(JsonPath::root());
        self.reveal_selection();
    }

    /// Moves a hidden selection to its outermost collapsed ancestor.
    fn reveal_selection(&mut self) {
        let mut target = self.selected;
        let mut cursor = self.nodes.get(self.selected).and_then(|n| n.parent);
        while let Some(id) = cursor {
            if !self.expanded.contains(&self.nodes[id].path) {
                target = id;
            }
            cursor = self.nodes[id].parent;
        }
        self.selected = target;
    }

    fn seed_layout(&mut self) {
        self.expanded.insert(JsonPath::root());
        for node in &self.nodes {
            if node.kind.is_container() && node.depth < self.expand_depth {
                self.expanded.insert(node.path.clone());
            }
        }
        self.layout_seeded = true;
    }

    fn fail(&mut self, reason: String) -> JsonScopeError {
        tracing::warn!(reason = %reason, "tree view unavailable");
        self.nodes.clear();
        self.index.clear();
        self.failure = Some(reason.clone());
        JsonScopeError::TreeUnavailable(reason)
    }
}

impl ViewRenderer for TreeRenderer {
    fn render(&mut self, document: &Value) -> Result<()> {
        let _span = tracing::debug_span!("tree_render").entered();

        self.clear_marks();
        self.nodes.clear();
        self.index.clear();
        self.failure = None;

        let mut stack: Vec<(&Value, JsonPath, usize, Option<usize>)> =
            vec![(document, JsonPath::root(), 0, None)];

        while let Some((value, path, depth, parent)) = stack.pop() {
            if self.nodes.len() >= self.max_nodes {
                return Err(self.fail(format!(
                    "document has more than {} nodes",
                    self.max_nodes
                )));
            }

            let id = self.nodes.len();
            let (preview, child_count) = describe(value);
            match value {
                Value::Object(map) => {
                    for (key, child) in map.iter().rev() {
                        stack.push((child, path.child_key(key), depth + 1, Some(id)));
                    }
                }
                Value::Array(items) => {
                    for (i, child) in items.iter().enumerate().rev() {
                        stack.push((child, path.child_index(i), depth + 1, Some(id)));
                    }
                }
                _ => {}
            }

            self.index.insert(path.clone(), id);
            self.nodes.push(TreeNode {
                label: label_for(&path),
                path,
                kind: NodeKind::of(value),
                preview,
                depth,
                parent,
                child_count,
                subtree_end: id + 1,
            });
        }

        for id in (1..self.nodes.len()).rev() {
            if let Some(parent) = self.nodes[id].parent {
                let end = self.nodes[id].subtree_end;
                let parent = &mut self.nodes[parent];
                parent.subtree_end = parent.subtree_end.max(end);
            }
        }

        if !self.layout_seeded {
            self.seed_layout();
        }
        if self.selected >= self.nodes.len() {
            self.selected = 0;
        }
        self.reveal_selection();

        tracing::debug!(node_count = self.nodes.len(), "tree rendered");
        Ok(())
    }

    fn mark_matches(&mut self, matches: &MatchSet) {
        self.marked = matches
            .iter()
            .filter_map(|m| self.index.get(&m.path).copied())
            .collect();
    }

    fn locate(&mut self, path: &JsonPath, kind: MatchKind) -> LocateOutcome {
        if !self.is_ready() {
            return LocateOutcome::Unavailable;
        }
        let Some(&id) = self.index.get(path) else {
            tracing::debug!(path = %path, "path not present in tree");
            return LocateOutcome::Unresolved;
        };

        let mut ancestor = self.nodes[id].parent;
        while let Some(parent) = ancestor {
            self.expanded.insert(self.nodes[parent].path.clone());
            ancestor = self.nodes[parent].parent;
        }

        self.current = Some((id, kind));
        self.selected = id;
        LocateOutcome::Located
    }

    fn clear_marks(&mut self) {
        self.marked.clear();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.failure.is_none() && !self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::build_match_set;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "a": {"x": {"y": "target"}, "w": 1},
            "b": {"z": [true, null]},
            "c": "plain"
        })
    }

    fn labels(tree: &TreeRenderer) -> Vec<String> {
        tree.visible_rows()
            .into_iter()
            .map(|id| tree.node(id).unwrap().label.clone())
            .collect()
    }

    fn path(segments: &[&str]) -> JsonPath {
        segments.iter().fold(JsonPath::root(), |p, s| p.child_key(s))
    }

    #[test]
    fn default_layout_opens_only_the_root() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();

        assert_eq!(tree.node_count(), 10);
        assert_eq!(labels(&tree), vec!["root", "a", "b", "c"]);
        let a = tree.node(1).unwrap();
        assert_eq!(a.preview, "{…} 2 keys");
        assert_eq!(a.subtree_end, 5);
    }

    #[test]
    fn locate_expands_only_ancestors() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();

        let target = path(&["a", "x", "y"]);
        assert_eq!(tree.locate(&target, MatchKind::Value), LocateOutcome::Located);

        assert_eq!(labels(&tree), vec!["root", "a", "x", "y", "w", "b", "c"]);
        let selected = tree.selected_node().unwrap();
        assert_eq!(selected.path, target);
        assert_eq!(tree.current(), Some((tree.selected(), MatchKind::Value)));
        let b = tree.visible_rows()[5];
        assert!(!tree.is_expanded(b));
    }

    #[test]
    fn locate_after_user_collapse_reopens_the_path() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();
        tree.expand_all();
        tree.collapse_all();
        assert_eq!(labels(&tree), vec!["root", "a", "b", "c"]);

        let target = path(&["b", "z"]).child_index(1);
        assert_eq!(tree.locate(&target, MatchKind::Value), LocateOutcome::Located);
        assert_eq!(labels(&tree), vec!["root", "a", "b", "z", "0", "1", "c"]);
    }

    #[test]
    fn stale_path_is_unresolved() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();
        assert_eq!(
            tree.locate(&path(&["gone"]), MatchKind::Key),
            LocateOutcome::Unresolved
        );
        assert!(tree.current().is_none());
    }

    #[test]
    fn marks_follow_match_paths_and_clear_on_render() {
        let mut tree = TreeRenderer::default();
        let document = doc();
        tree.render(&document).unwrap();

        let matches = build_match_set(&document, "x", 1);
        tree.mark_matches(&matches);
        let marked: Vec<usize> = (0..tree.node_count()).filter(|&id| tree.is_marked(id)).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(tree.node(marked[0]).unwrap().path, path(&["a", "x"]));

        tree.render(&document).unwrap();
        assert!((0..tree.node_count()).all(|id| !tree.is_marked(id)));
    }

    #[test]
    fn rerender_keeps_expansion_until_layout_reset() {
        let mut tree = TreeRenderer::default();
        let document = doc();
        tree.render(&document).unwrap();
        tree.expand_all();
        tree.render(&document).unwrap();
        assert_eq!(tree.visible_rows().len(), 10);

        tree.reset_layout();
        tree.render(&document).unwrap();
        assert_eq!(labels(&tree), vec!["root", "a", "b", "c"]);
    }

    #[test]
    fn collapse_all_moves_hidden_selection_up() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();
        let _ = tree.locate(&path(&["a", "x", "y"]), MatchKind::Value);
        tree.collapse_all();
        assert_eq!(tree.selected_node().unwrap().path, path(&["a"]));
    }

    #[test]
    fn selection_wraps_over_visible_rows() {
        let mut tree = TreeRenderer::default();
        tree.render(&doc()).unwrap();
        tree.move_selection_up();
        assert_eq!(tree.selected_node().unwrap().label, "c");
        tree.move_selection_down();
        assert_eq!(tree.selected_node().unwrap().label, "root");
        tree.move_selection_down();
        assert!(tree.toggle_selected());
        assert_eq!(labels(&tree), vec!["root", "a", "x", "w", "b", "c"]);
        tree.page(10, true);
        assert_eq!(tree.selected_node().unwrap().label, "c");
        assert!(!tree.toggle_selected());
    }

    #[test]
    fn oversized_document_makes_tree_unavailable() {
        let mut tree = TreeRenderer::new(1, 3);
        let err = tree.render(&doc()).unwrap_err();
        assert!(matches!(err, JsonScopeError::TreeUnavailable(_)));
        assert!(!tree.is_ready());
        assert!(tree.failure().is_some());
        assert_eq!(
            tree.locate(&path(&["a"]), MatchKind::Key),
            LocateOutcome::Unavailable
        );

        let mut roomy = TreeRenderer::new(1, 100);
        roomy.render(&json!({"small": 1})).unwrap();
        assert!(roomy.is_ready());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("héllo", 5), "héllo");
    }
}
