//! The single current JSON document.
//!
//! [`DocumentStore`] owns the document being explored. It is replaced
//! wholesale on every delivery and never mutated in place; each replacement
//! bumps a revision counter so that anything derived from an older document
//! (match sets, highlights) can be recognised as stale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    /// Read from a file on the host.
    File {
        /// Path as given by the user (may start with `~`).
        path: String,
    },
    /// Delivered inline through a Zellij pipe.
    Pipe {
        /// Pipe name the payload arrived on.
        name: String,
    },
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => f.write_str(path),
            Self::Pipe { name } => write!(f, "pipe:{name}"),
        }
    }
}

/// Holder of the current document.
///
/// # Example
///
/// ```
/// use jsonscope::domain::{DocumentSource, DocumentStore};
/// use serde_json::json;
///
/// let mut store = DocumentStore::default();
/// assert!(store.get().is_none());
///
/// let revision = store.set(json!({"a": 1}), DocumentSource::Pipe { name: "jsonscope".into() });
/// assert_eq!(revision, 1);
/// assert_eq!(store.get(), Some(&json!({"a": 1})));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    current: Option<Value>,
    source: Option<DocumentSource>,
    revision: u64,
    received_at: Option<i64>,
}

impl DocumentStore {
    /// Replaces the held document and returns the new revision.
    ///
    /// Callers are responsible for dropping everything derived from the
    /// previous document; `AppState::set_document` does so synchronously.
    pub fn set(&mut self, document: Value, source: DocumentSource) -> u64 {
        self.current = Some(document);
        self.source = Some(source);
        self.revision += 1;
        self.received_at = Some(chrono::Utc::now().timestamp());
        tracing::debug!(revision = self.revision, "document replaced");
        self.revision
    }

    /// Returns the current document, or `None` before the first delivery.
    #[must_use]
    pub const fn get(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    /// Revision of the current document; `0` while empty.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn source(&self) -> Option<&DocumentSource> {
        self.source.as_ref()
    }

    /// Unix timestamp (UTC seconds) of the last replacement.
    #[must_use]
    pub const fn received_at(&self) -> Option<i64> {
        self.received_at
    }

    /// Returns `true` if `document` equals the held one.
    #[must_use]
    pub fn is_current(&self, document: &Value) -> bool {
        self.current.as_ref() == Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipe() -> DocumentSource {
        DocumentSource::Pipe { name: "test".into() }
    }

    #[test]
    fn set_replaces_and_bumps_revision() {
        let mut store = DocumentStore::default();
        assert_eq!(store.revision(), 0);
        assert!(store.received_at().is_none());

        store.set(json!({"a": 1}), pipe());
        let second = store.set(json!([1, 2]), DocumentSource::File { path: "~/out.json".into() });

        assert_eq!(second, 2);
        assert_eq!(store.get(), Some(&json!([1, 2])));
        assert!(store.received_at().is_some());
        assert_eq!(store.source().map(ToString::to_string).as_deref(), Some("~/out.json"));
    }

    #[test]
    fn is_current_compares_by_value() {
        let mut store = DocumentStore::default();
        assert!(!store.is_current(&json!(null)));
        store.set(json!({"k": [true]}), pipe());
        assert!(store.is_current(&json!({"k": [true]})));
        assert!(!store.is_current(&json!({"k": [false]})));
    }
}
