//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the jsonscope
//! library and the Zellij plugin system. It implements the `ZellijPlugin` and
//! `ZellijWorker` traits to handle Zellij events and lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ JsonScopeWorker  │   │  ← File reads, JSON parsing
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `CustomMessage`, `Timer` and filesystem events
//! 3. **Permissions granted**: Ask the worker to load `document_path`
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Pipe**: Forward piped documents (or paths) to the worker
//! 6. **Render**: Call library render function
//!
//! # Event Mapping
//!
//! - `Key(..)` → navigation, search and view events (see keybindings)
//! - `Timer` → `Event::DebounceElapsed`
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `FileSystemUpdate` touching the document → `Event::ReloadDocument`
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n`: Next match
//! - `Ctrl+p`: Previous match
//!
//! In normal mode:
//! - `j`/`Down`, `k`/`Up`: Move selection (tree) or scroll (text)
//! - `PageDown`/`PageUp`: Move by a page
//! - `Enter`/`Space`/`l`/`h`: Toggle the selected node
//! - `E`/`C`: Expand/collapse all
//! - `/`: Enter search mode
//! - `n`/`N`: Next/previous match
//! - `t`/`c`: Tree/text view
//! - `r`: Reload the document
//! - `Esc`: Clear the search
//! - `q`: Close plugin
//!
//! In search mode (typing):
//! - Characters edit the query
//! - `Enter`: Next match
//! - `Tab`: Focus the results
//! - `Esc`: Exit search
//!
//! In search mode (navigating):
//! - `n`/`j`/`Down`, `N`/`k`/`Up`: Next/previous match
//! - `/`: Back to the query
//! - `t`/`c`: Tree/text view
//! - `Enter`: Close the search box, keep highlights
//! - `Esc`: Exit search

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use jsonscope::infrastructure::is_same_file;
use jsonscope::worker::{JsonScopeWorker, WorkerMessage, WorkerResponse};
use jsonscope::{handle_event, Action, Config, Event, InputMode, SearchFocus};

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(JsonScopeWorker, jsonscope_worker, JSONSCOPE_WORKER);

/// Pipe name documents are delivered on, and the worker's name.
const PIPE_NAME: &str = "jsonscope";

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication.
struct State {
    /// Core application state from library layer.
    app: jsonscope::app::AppState,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,

    /// Set once the user granted the requested permissions.
    permitted: bool,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: jsonscope::initialize(&default_config),
            worker_name: PIPE_NAME.to_string(),
            permitted: false,
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// Requests:
    /// - `ReadApplicationState`: Receive pipe messages
    /// - `FullHdAccess`: Read the document from the host filesystem
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `CustomMessage`: Worker responses
    /// - `Timer`: Debounce timers
    /// - `FileSystemCreate`/`FileSystemUpdate`: Document rewritten on disk
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        jsonscope::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(document_path = ?config.document_path, "parsed configuration");
        self.app = jsonscope::initialize(&config);

        request_permission(&[
            PermissionType::ReadApplicationState,
            PermissionType::FullHdAccess,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::Timer,
            EventType::PermissionRequestResult,
            EventType::FileSystemCreate,
            EventType::FileSystemUpdate,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Timer(_) => Event::DebounceElapsed,
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::FileSystemCreate(paths)
            | zellij_tile::prelude::Event::FileSystemUpdate(paths) => {
                let touched: Vec<_> = paths.into_iter().map(|(path, _)| path).collect();
                if !self.touches_document(&touched) {
                    return false;
                }
                tracing::debug!(path_count = touched.len(), "document changed on disk");
                Event::ReloadDocument
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions);
                return false;
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    /// Receives documents piped with `zellij pipe --name jsonscope`.
    ///
    /// An inline payload is parsed on the worker; `--args path=<file>` makes
    /// that file the document (and the target of later reloads).
    fn pipe(&mut self, pipe_message: PipeMessage) -> bool {
        if pipe_message.name != PIPE_NAME {
            return false;
        }
        let span = tracing::debug_span!("plugin_pipe", name = %pipe_message.name);
        let _guard = span.entered();

        if let PipeSource::Cli(ref pipe_id) = pipe_message.source {
            unblock_cli_pipe_input(pipe_id);
        }

        if let Some(payload) = pipe_message.payload {
            tracing::debug!(payload_len = payload.len(), "document piped in");
            self.post_worker_message(&WorkerMessage::parse_document(pipe_message.name, payload));
        } else if let Some(path) = pipe_message.args.get("path") {
            tracing::debug!(path = %path, "document path piped in");
            self.app.document_path = Some(path.clone());
            self.post_worker_message(&WorkerMessage::load_document(path.clone()));
        } else {
            tracing::debug!("pipe message without payload or path");
        }
        false
    }

    /// Renders the plugin UI.
    fn render(&mut self, rows: usize, cols: usize) {
        self.app.set_viewport(rows);
        jsonscope::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            zellij_tile::prelude::Event::FileSystemCreate(..)
            | zellij_tile::prelude::Event::FileSystemUpdate(..) => "FileSystemUpdate".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Whether any of `paths` is the configured document.
    fn touches_document(&self, paths: &[PathBuf]) -> bool {
        let Some(document) = self.app.document_path.as_deref() else {
            return false;
        };
        paths.iter().any(|path| is_same_file(document, path))
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::NextMatch);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::PrevMatch);
        }

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Self::map_typing_key(key),
            InputMode::Search(SearchFocus::Navigating) => Self::map_navigating_key(key),
            InputMode::Normal => Self::map_normal_key(key),
        }
    }

    fn map_typing_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Esc => Event::ExitSearch,
            BareKey::Enter => Event::NextMatch,
            BareKey::Tab => Event::FocusResults,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_navigating_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Esc => Event::ExitSearch,
            BareKey::Enter => Event::LeaveSearchBar,
            BareKey::Down | BareKey::Char('n' | 'j') => Event::NextMatch,
            BareKey::Up | BareKey::Char('N' | 'k') => Event::PrevMatch,
            BareKey::Char('/') => Event::FocusSearchBar,
            BareKey::Char('t') => Event::ShowTree,
            BareKey::Char('c') => Event::ShowText,
            _ => return None,
        })
    }

    fn map_normal_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::PageDown => Event::PageDown,
            BareKey::PageUp => Event::PageUp,
            BareKey::Enter | BareKey::Char(' ' | 'l' | 'h') => Event::ToggleNode,
            BareKey::Char('E') => Event::ExpandAll,
            BareKey::Char('C') => Event::CollapseAll,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('n') => Event::NextMatch,
            BareKey::Char('N') => Event::PrevMatch,
            BareKey::Char('t') => Event::ShowTree,
            BareKey::Char('c') => Event::ShowText,
            BareKey::Char('r') => Event::ReloadDocument,
            BareKey::Esc => Event::Escape,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    /// Handles permission request results.
    fn handle_permission_result(&mut self, permissions: PermissionStatus) {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - loading document");
                self.permitted = true;
                watch_filesystem();
                if let Some(path) = self.app.document_path.clone() {
                    self.post_worker_message(&WorkerMessage::load_document(path));
                }
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - only piped documents can be shown");
            }
        }
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            Some(Event::WorkerResponse(WorkerResponse::from_wire(payload)))
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Posts a message to the worker thread.
    ///
    /// Serializes the message as JSON and sends via Zellij's IPC system.
    /// Serialization errors are logged but not propagated.
    fn post_worker_message(&self, message: &WorkerMessage) {
        if !self.permitted {
            if let WorkerMessage::LoadDocument { path, .. } = message {
                tracing::debug!(path = %path, "no filesystem access yet, load deferred");
                return;
            }
        }
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// # Actions
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `ArmTimer`: Start a one-shot host timer
    /// - `PostToWorker`: Send IPC message to worker thread
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::ArmTimer { delay } => {
                set_timeout(delay.as_secs_f64());
            }
            Action::PostToWorker(ref message) => {
                tracing::debug!(message = ?message, "posting message to worker");
                self.post_worker_message(message);
            }
        }
    }
}
