//! Search engine: indexing, cyclic navigation and keystroke debouncing.
//!
//! ```text
//! query keystrokes ─▶ Debouncer ─▶ build_match_set(document, query) ─▶ MatchSet ─▶ Cursor
//! ```
//!
//! - [`indexer`]: ordered pre-order key/value search
//! - [`cursor`]: current match with wrapping next/prev
//! - [`debounce`]: quiet-interval gate driven by host timers

pub mod cursor;
pub mod debounce;
pub mod indexer;

pub use cursor::{Cursor, Direction};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use indexer::{build_match_set, scalar_text, Match, MatchKind, MatchSet};
