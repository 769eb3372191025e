//! Error types for the jsonscope plugin.
//!
//! This module defines the centralized error type [`JsonScopeError`] and a type
//! alias [`Result`] used throughout the crate. All variants are derived with
//! `thiserror`.
//!
//! Nothing in the search engine treats these errors as fatal: renderer and
//! worker failures are reported through the status line and the engine keeps
//! accepting queries.

use thiserror::Error;

/// The main error type for jsonscope operations.
///
/// # Examples
///
/// ```
/// use jsonscope::JsonScopeError;
///
/// fn color(hex: &str) -> Result<&str, JsonScopeError> {
///     if hex.starts_with('#') {
///         Ok(hex)
///     } else {
///         Err(JsonScopeError::Theme(format!("invalid color: {hex}")))
///     }
/// }
///
/// assert!(color("red").is_err());
/// ```
#[derive(Debug, Error)]
pub enum JsonScopeError {
    /// Reading a document or theme from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document payload was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// The tree view could not be built for the current document.
    ///
    /// Non-fatal: the text view stays usable.
    #[error("Tree view unavailable: {0}")]
    TreeUnavailable(String),
}

/// A specialized `Result` type for jsonscope operations.
pub type Result<T> = std::result::Result<T, JsonScopeError>;
