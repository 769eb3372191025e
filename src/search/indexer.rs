//! Ordered key/value search over a JSON document.
//!
//! [`build_match_set`] walks the document in pre-order (for each object
//! member: the key first, then the member's whole subtree, then the next
//! member) and collects every key or scalar whose text contains the query,
//! compared case-insensitively. The result is an immutable [`MatchSet`].
//!
//! The walk uses an explicit stack, so nesting depth is bounded by memory
//! rather than by the call stack.

use crate::domain::JsonPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a match came from an object member name or a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    Key,
    Value,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Address of the member (for keys) or scalar (for values).
    pub path: JsonPath,
    /// The key, or the stringified scalar.
    pub text: String,
    pub kind: MatchKind,
}

/// The ordered result of one search pass.
///
/// Built fresh per (document, query) pair and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    query: String,
    revision: u64,
    matches: Vec<Match>,
}

impl MatchSet {
    /// An empty set not tied to any document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The effective (trimmed) query this set was built for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Revision of the document this set was built against.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Match> {
        self.matches.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Fixed textual form of a scalar used for comparison and display.
///
/// Strings are taken verbatim, numbers use `serde_json`'s canonical form,
/// booleans are `true`/`false` and null is `null`. Containers have no scalar
/// text; their `Display` form is used as a fallback.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

enum Visit<'a> {
    Node(&'a Value, JsonPath),
    Member(&'a str, &'a Value, JsonPath),
}

/// Searches `document` for `query`.
///
/// The query is trimmed; an empty query yields an empty set. The query is
/// literal text, never a pattern.
///
/// # Parameters
///
/// * `document` - Document to search
/// * `query` - Raw query text from the search box
/// * `revision` - Revision of `document` in the store, recorded in the result
///
/// # Example
///
/// ```
/// use jsonscope::search::{build_match_set, MatchKind};
/// use serde_json::json;
///
/// let doc = json!({"a": "hello world", "b": {"c": "HELLO"}});
/// let set = build_match_set(&doc, "hello", 1);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.get(1).map(|m| m.text.as_str()), Some("HELLO"));
/// assert!(set.iter().all(|m| m.kind == MatchKind::Value));
/// ```
#[must_use]
pub fn build_match_set(document: &Value, query: &str, revision: u64) -> MatchSet {
    let query = query.trim();
    let _span = tracing::debug_span!("build_match_set", query_len = query.len(), revision).entered();

    if query.is_empty() {
        return MatchSet {
            query: String::new(),
            revision,
            matches: Vec::new(),
        };
    }

    let needle = query.to_lowercase();
    let mut matches = Vec::new();
    let mut stack = vec![Visit::Node(document, JsonPath::root())];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Member(key, value, path) => {
                if key.to_lowercase().contains(&needle) {
                    matches.push(Match {
                        path: path.clone(),
                        text: key.to_string(),
                        kind: MatchKind::Key,
                    });
                }
                stack.push(Visit::Node(value, path));
            }
            Visit::Node(Value::Object(map), path) => {
                for (key, value) in map.iter().rev() {
                    let child = path.child_key(key);
                    stack.push(Visit::Member(key.as_str(), value, child));
                }
            }
            Visit::Node(Value::Array(items), path) => {
                for (index, item) in items.iter().enumerate().rev() {
                    stack.push(Visit::Node(item, path.child_index(index)));
                }
            }
            Visit::Node(scalar, path) => {
                let text = scalar_text(scalar);
                if text.to_lowercase().contains(&needle) {
                    matches.push(Match {
                        path,
                        text,
                        kind: MatchKind::Value,
                    });
                }
            }
        }
    }

    tracing::debug!(match_count = matches.len(), "search pass complete");

    MatchSet {
        query: query.to_string(),
        revision,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(set: &MatchSet) -> Vec<(String, MatchKind, String)> {
        set.iter()
            .map(|m| (m.path.to_string(), m.kind, m.text.clone()))
            .collect()
    }

    #[test]
    fn values_match_case_insensitively_in_document_order() {
        let doc = json!({"a": "hello world", "b": {"c": "HELLO"}});
        let set = build_match_set(&doc, "hello", 3);

        assert_eq!(
            summary(&set),
            vec![
                ("$.a".into(), MatchKind::Value, "hello world".into()),
                ("$.b.c".into(), MatchKind::Value, "HELLO".into()),
            ]
        );
        assert_eq!(set.revision(), 3);
        assert_eq!(set.query(), "hello");
    }

    #[test]
    fn key_substring_matches_without_value_match() {
        let doc = json!({"apple": 1});
        let set = build_match_set(&doc, "app", 1);

        assert_eq!(set.len(), 1);
        let m = set.get(0).unwrap();
        assert_eq!(m.kind, MatchKind::Key);
        assert_eq!(m.text, "apple");
        assert_eq!(m.path, JsonPath::root().child_key("apple"));
    }

    #[test]
    fn key_match_precedes_its_subtree_and_later_siblings() {
        let doc = json!({
            "x": {"deep": "x marks"},
            "y": "x again",
        });
        let set = build_match_set(&doc, "x", 1);

        assert_eq!(
            summary(&set),
            vec![
                ("$.x".into(), MatchKind::Key, "x".into()),
                ("$.x.deep".into(), MatchKind::Value, "x marks".into()),
                ("$.y".into(), MatchKind::Value, "x again".into()),
            ]
        );
    }

    #[test]
    fn arrays_contribute_no_key_matches() {
        let doc = json!({"list": ["0", {"zero": 0}, 10]});
        let set = build_match_set(&doc, "0", 1);

        assert_eq!(
            summary(&set),
            vec![
                ("$.list[0]".into(), MatchKind::Value, "0".into()),
                ("$.list[1].zero".into(), MatchKind::Value, "0".into()),
                ("$.list[2]".into(), MatchKind::Value, "10".into()),
            ]
        );
    }

    #[test]
    fn scalars_use_fixed_textual_forms() {
        let doc = json!({"flag": true, "none": null, "ratio": 0.5});
        assert_eq!(build_match_set(&doc, "TRUE", 1).len(), 1);
        assert_eq!(build_match_set(&doc, "nul", 1).get(0).map(|m| m.text.as_str()), Some("null"));
        assert_eq!(build_match_set(&doc, "0.5", 1).len(), 1);
    }

    #[test]
    fn empty_or_blank_query_matches_nothing() {
        let doc = json!({"a": "", "b": " "});
        assert!(build_match_set(&doc, "", 1).is_empty());
        assert!(build_match_set(&doc, "   ", 1).is_empty());
    }

    #[test]
    fn query_is_literal_and_trimmed() {
        let doc = json!({"topic": "5G+ networks", "other": "5GGG"});
        let set = build_match_set(&doc, "  5G+ ", 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.query(), "5G+");
        assert_eq!(set.get(0).map(|m| m.text.as_str()), Some("5G+ networks"));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let doc = json!({
            "services": [
                {"name": "alpha", "tags": ["edge", "Alpha-2"]},
                {"name": "beta", "alphabet": {"alpha": null}}
            ]
        });
        assert_eq!(build_match_set(&doc, "alpha", 7), build_match_set(&doc, "alpha", 7));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut doc = json!("needle");
        for _ in 0..5_000 {
            doc = json!([doc]);
        }
        let set = build_match_set(&doc, "needle", 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().path.len(), 5_000);
        // serde_json drops nested values recursively; unwind it by hand.
        let mut node = doc;
        while let Value::Array(mut items) = node {
            node = items.pop().unwrap_or(Value::Null);
        }
    }

    #[test]
    fn scalar_root_is_searchable() {
        let set = build_match_set(&json!("Top level"), "level", 1);
        assert_eq!(set.len(), 1);
        assert!(set.get(0).unwrap().path.is_root());
    }
}
