//! Addressing of nodes inside a JSON document.
//!
//! A [`JsonPath`] is the ordered sequence of object keys and array indices
//! leading from the document root to a node. It is the stable address shared
//! between the search indexer (which emits paths) and the view renderers
//! (which look them up in the indexes they build while rendering).
//!
//! Two paths are equal iff they have the same length and the same segments in
//! the same order, which is exactly the derived `PartialEq`/`Hash`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Member name of an object.
    Key(String),
    /// Element position in an array.
    Index(usize),
}

/// Ordered key/index sequence from the document root to a node.
///
/// The empty path addresses the root itself.
///
/// # Example
///
/// ```
/// use jsonscope::domain::JsonPath;
///
/// let path = JsonPath::root().child_key("b").child_key("c").child_index(1);
///
/// assert_eq!(path.to_string(), "$.b.c[1]");
/// assert_eq!(path.to_pointer(), "/b/c/1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The path of the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by an object key.
    #[must_use]
    pub fn child_key(&self, key: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// Returns this path extended by an array index.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Renders the path as an RFC 6901 JSON Pointer.
    #[must_use]
    pub fn to_pointer(&self) -> String {
        self.0.iter().fold(String::new(), |mut pointer, segment| {
            pointer.push('/');
            match segment {
                PathSegment::Key(key) => pointer.push_str(&escape_pointer_token(key)),
                PathSegment::Index(index) => pointer.push_str(&index.to_string()),
            }
            pointer
        })
    }
}

/// `~` → `~0`, `/` → `~1`.
fn escape_pointer_token(raw: &str) -> String {
    raw.replace('~', "~0").replace('/', "~1")
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => write!(f, ".{key}")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = JsonPath::root().child_key("b").child_key("c");
        let b: JsonPath = serde_json::from_str(r#"["b", "c"]"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, JsonPath::root().child_key("b"));
        assert_ne!(
            JsonPath::root().child_index(0),
            JsonPath::root().child_key("0")
        );
    }

    #[test]
    fn display_quotes_non_identifier_keys() {
        let path = JsonPath::root().child_key("odd key").child_index(2).child_key("ok");
        assert_eq!(path.to_string(), "$[\"odd key\"][2].ok");
        assert_eq!(JsonPath::root().to_string(), "$");
    }

    #[test]
    fn pointer_escapes_tokens() {
        let path = JsonPath::root().child_key("a/b").child_key("m~n");
        assert_eq!(path.to_pointer(), "/a~1b/m~0n");
    }

    #[test]
    fn serializes_as_plain_array() {
        let path = JsonPath::root().child_key("b").child_index(0);
        let encoded = serde_json::to_string(&path).unwrap();
        assert_eq!(encoded, r#"["b",0]"#);
        let decoded: JsonPath = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, path);
    }
}
