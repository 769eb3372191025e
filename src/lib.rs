//! jsonscope: A Zellij plugin for exploring large JSON documents.
//!
//! jsonscope is a terminal multiplexer plugin that provides:
//! - Case-insensitive, debounced search over keys and scalar values
//! - Cyclic next/previous navigation with a `current/total` indicator
//! - Two synchronized presentations of the same document: a collapsible tree
//!   and pretty-printed, syntax-coloured text
//! - Document delivery from a file (re-read on change) or through a pipe
//! - Asynchronous loading and parsing via Zellij worker threads

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Highlight controller                             │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Views         │   │ Search        │   │ Worker Layer  │
//! │ (views/)      │   │ (search/)     │   │ (worker/)     │
//! │ - Tree        │   │ - Indexer     │   │ - File read   │
//! │ - Text        │   │ - Cursor      │   │ - JSON parse  │
//! │ - Printer     │   │ - Debounce    │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Document store, JSON paths, errors (domain/)     │
//! │  - Sandbox paths (infrastructure/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  UI (ui/) and Observability (observability/)        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Document store, JSON paths and errors
//! - [`search`]: Match indexing, cursor and debounce
//! - [`views`]: Tree and text renderers behind one trait
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`worker`]: Background worker for document loading
//! - [`ui`]: Terminal rendering with theme support
//! - `observability`: OpenTelemetry tracing (internal)
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/jsonscope.wasm" {
//!         document_path "~/analysis/out.json"
//!         debounce_ms "300"
//!         tree_expand_depth "1"
//!         max_tree_nodes "200000"
//!         default_view "tree"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! Documents can also be piped in:
//!
//! ```text
//! zellij pipe --name jsonscope -- '{"status": "ok"}'
//! zellij pipe --name jsonscope --args path=/tmp/report.json
//! ```
//!
//! # Example
//!
//! ```rust
//! use jsonscope::domain::DocumentSource;
//! use jsonscope::worker::WorkerResponse;
//! use jsonscope::{handle_event, initialize, Config, Event};
//! use serde_json::json;
//!
//! let mut state = initialize(&Config::default());
//! let loaded = WorkerResponse::DocumentLoaded {
//!     source: DocumentSource::Pipe { name: "jsonscope".into() },
//!     document: json!({"user": {"name": "Ada"}, "tags": ["admin"]}),
//! };
//!
//! for event in [
//!     Event::WorkerResponse(loaded),
//!     Event::SearchMode,
//!     Event::Char('a'),
//!     Event::Char('d'),
//!     Event::DebounceElapsed,
//!     Event::DebounceElapsed,
//! ] {
//!     handle_event(&mut state, &event)?;
//! }
//! assert_eq!(state.result_indicator().as_deref(), Some("1/2"));
//! # Ok::<(), jsonscope::JsonScopeError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator with 24-bit colour

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod search;
pub mod views;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus, ViewMode};
pub use domain::{JsonScopeError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::str::FromStr;

/// Plugin configuration parsed from Zellij's configuration system.
///
/// Configuration values are provided via Zellij's KDL layout configuration
/// and passed to the plugin during initialization.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file to load on start-up and re-read on change.
    ///
    /// Paths starting with `~` are resolved against the host home directory.
    pub document_path: Option<String>,

    /// Quiet period after the last keystroke before a search runs. Default: 300
    pub debounce_ms: u64,

    /// Containers shallower than this start expanded in the tree. Default: 1
    pub tree_expand_depth: usize,

    /// Node count above which the tree view is unavailable. Default: 200 000
    pub max_tree_nodes: usize,

    /// View shown on start-up. Default: tree
    pub default_view: ViewMode,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: None,
            debounce_ms: 300,
            tree_expand_depth: views::tree::DEFAULT_EXPAND_DEPTH,
            max_tree_nodes: views::tree::DEFAULT_MAX_NODES,
            default_view: ViewMode::Tree,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

/// Parses `key` when present and well-formed.
fn parse_option<T: FromStr>(config: &BTreeMap<String, String>, key: &str) -> Option<T> {
    config.get(key).and_then(|raw| raw.trim().parse().ok())
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Missing or malformed values fall back to their defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `document_path`: String → `Option<String>` (blank means none)
    /// - `debounce_ms`: String → `u64`
    /// - `tree_expand_depth`: String → `usize`
    /// - `max_tree_nodes`: String → `usize` (must be positive)
    /// - `default_view`: `tree` | `text` (`code` is accepted for `text`)
    /// - `theme`, `theme_file`, `trace_level`: String → `Option<String>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use jsonscope::{Config, ViewMode};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "150".to_string());
    /// map.insert("default_view".to_string(), "text".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.debounce_ms, 150);
    /// assert_eq!(config.default_view, ViewMode::Text);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let document_path = config
            .get("document_path")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let default_view = config
            .get("default_view")
            .and_then(|v| ViewMode::from_option(v))
            .unwrap_or(defaults.default_view);

        Self {
            document_path,
            debounce_ms: parse_option(config, "debounce_ms").unwrap_or(defaults.debounce_ms),
            tree_expand_depth: parse_option(config, "tree_expand_depth")
                .unwrap_or(defaults.tree_expand_depth),
            max_tree_nodes: parse_option(config, "max_tree_nodes")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_tree_nodes),
            default_view,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Creates a new `AppState` with the configured theme (from file, name, or
/// default) and no document; the first one arrives from the worker.
///
/// # Example
///
/// ```rust
/// use jsonscope::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("catppuccin-latte".to_string()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.theme.name, "catppuccin-latte");
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing jsonscope plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(
                Theme::default,
                |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                        Theme::default()
                    })
                },
            )
        },
        |theme_file| {
            Theme::from_file(infrastructure::sandbox_path(theme_file)).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(config, theme)
}
