//! Domain layer for the jsonscope plugin.
//!
//! Core types that are independent of Zellij and of any rendering concern.
//!
//! # Organization
//!
//! - [`error`]: Error type and result alias
//! - [`path`]: Key/index addressing of document nodes
//! - [`document`]: The replace-only holder of the current document
//!
//! # Examples
//!
//! ```
//! use jsonscope::domain::{DocumentSource, DocumentStore, JsonPath};
//! use serde_json::json;
//!
//! let mut store = DocumentStore::default();
//! let revision = store.set(json!({"tags": ["x"]}), DocumentSource::Pipe { name: "cli".into() });
//! assert_eq!(revision, 1);
//!
//! let path = JsonPath::root().child_key("tags").child_index(0);
//! assert_eq!(path.to_pointer(), "/tags/0");
//! ```

pub mod document;
pub mod error;
pub mod path;

pub use document::{DocumentSource, DocumentStore};
pub use error::{JsonScopeError, Result};
pub use path::{JsonPath, PathSegment};
