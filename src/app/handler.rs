//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! timer ticks and worker responses, translating them into state changes and
//! action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Navigation**: `KeyDown`, `KeyUp`, `PageDown`, `PageUp`, `ToggleNode`
//! - **Input**: `Char`, `Backspace`, `Escape`
//! - **Search**: `SearchMode`, `NextMatch`, `PrevMatch`, `DebounceElapsed`
//! - **Views**: `ShowTree`, `ShowText`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use jsonscope::app::{handle_event, Action, AppState, Event};
//! use jsonscope::ui::Theme;
//! use jsonscope::Config;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! handle_event(&mut state, &Event::SearchMode)?;
//! let (_, actions) = handle_event(&mut state, &Event::Char('a'))?;
//! assert!(matches!(actions[..], [Action::ArmTimer { .. }]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::modes::{InputMode, SearchFocus, ViewMode};
use super::state::StatusMessage;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::DocumentSource;
use crate::search::Direction;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, timers, or worker responses.
///
/// The event handler processes these sequentially, so state transitions are
/// deterministic for a given event sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the tree selection down (wraps) or scrolls the text down.
    KeyDown,
    /// Moves the tree selection up (wraps) or scrolls the text up.
    KeyUp,
    /// Moves by one body height.
    PageDown,
    PageUp,
    /// Expands or collapses the selected tree node.
    ToggleNode,
    ExpandAll,
    CollapseAll,
    /// Hides the plugin pane.
    CloseFocus,

    /// Enters search mode with an empty query.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Focuses match navigation (from typing mode).
    FocusResults,
    /// Closes the search box but keeps the highlights.
    LeaveSearchBar,
    /// Exits search mode and clears the query and highlights.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Clears the search in normal mode.
    Escape,

    /// Advances to the next match, running a pending search first.
    NextMatch,
    PrevMatch,

    ShowTree,
    ShowText,

    /// A debounce timer armed by [`Action::ArmTimer`] fired.
    DebounceElapsed,

    /// Asks the worker to read `document_path` again.
    ReloadDocument,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// Whether the UI needs re-rendering, and the actions to execute in sequence.
///
/// # Errors
///
/// Returns errors from state mutation methods or worker communication failures.
#[allow(clippy::cognitive_complexity, clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::KeyDown => {
            state.move_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_up();
            Ok((true, vec![]))
        }
        Event::PageDown => {
            state.page(true);
            Ok((true, vec![]))
        }
        Event::PageUp => {
            state.page(false);
            Ok((true, vec![]))
        }
        Event::ToggleNode => {
            if state.view_mode != ViewMode::Tree {
                return Ok((false, vec![]));
            }
            Ok((state.tree.toggle_selected(), vec![]))
        }
        Event::ExpandAll => {
            if state.view_mode != ViewMode::Tree {
                return Ok((false, vec![]));
            }
            state.tree.expand_all();
            Ok((true, vec![]))
        }
        Event::CollapseAll => {
            if state.view_mode != ViewMode::Tree {
                return Ok((false, vec![]));
            }
            state.tree.collapse_all();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.clear_search();
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.search_query.trim().is_empty() {
                state.input_mode = InputMode::Normal;
                return Ok((true, vec![]));
            }

            if state.debounce.is_pending() {
                state.run_search();
            }
            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::LeaveSearchBar => {
            tracing::debug!(query = %state.search_query, "closing search box");
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.clear_search();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }

            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, char = %c, "search query updated");

            let delay = state.schedule_search();
            Ok((true, vec![Action::ArmTimer { delay }]))
        }
        Event::Backspace => {
            if !state.input_mode.is_search() {
                return Ok((false, vec![]));
            }

            state.search_query.pop();
            if state.search_query.trim().is_empty() {
                state.debounce.cancel();
                state.highlight.clear(&mut [&mut state.tree, &mut state.text]);
                state.status = None;
                return Ok((true, vec![]));
            }

            let delay = state.schedule_search();
            Ok((true, vec![Action::ArmTimer { delay }]))
        }
        Event::Escape => {
            state.input_mode = InputMode::Normal;
            state.clear_search();
            Ok((true, vec![]))
        }
        Event::NextMatch | Event::PrevMatch => {
            let direction = if *event == Event::NextMatch {
                Direction::Next
            } else {
                Direction::Prev
            };

            if state.debounce.is_pending() {
                state.run_search();
                return Ok((true, vec![]));
            }
            if state.navigate(direction) {
                return Ok((true, vec![]));
            }
            if !state.search_query.trim().is_empty() && state.document.get().is_some() {
                tracing::debug!("no active match set, searching again");
                state.run_search();
                return Ok((true, vec![]));
            }
            Ok((false, vec![]))
        }
        Event::ShowTree => Ok((state.switch_view(ViewMode::Tree), vec![])),
        Event::ShowText => Ok((state.switch_view(ViewMode::Text), vec![])),
        Event::DebounceElapsed => Ok((state.on_debounce_timer(), vec![])),
        Event::ReloadDocument => {
            let Some(path) = state.document_path.clone() else {
                state.status = Some(StatusMessage::warn("No document_path configured"));
                return Ok((true, vec![]));
            };
            tracing::debug!(path = %path, "reloading document");
            Ok((false, vec![Action::PostToWorker(WorkerMessage::load_document(path))]))
        }
        Event::WorkerResponse(response) => match response {
            WorkerResponse::DocumentLoaded { source, document } => {
                // Filesystem watches fire on every write; an unchanged file
                // keeps the current search. Piped documents always replace.
                let unchanged_file = matches!(source, DocumentSource::File { .. })
                    && state.document.source() == Some(source)
                    && state.document.is_current(document);
                if unchanged_file {
                    tracing::debug!(source = %source, "file unchanged, skipping render");
                    return Ok((false, vec![]));
                }
                state.set_document(document.clone(), source.clone());
                if state.status.is_none() {
                    state.status = Some(StatusMessage::info(format!("Loaded {source}")));
                }
                Ok((true, vec![]))
            }
            WorkerResponse::Error { message } => {
                tracing::error!("Worker error: {}", message);
                state.status = Some(StatusMessage::error(message.clone()));
                Ok((true, vec![]))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Theme;
    use crate::Config;
    use serde_json::json;

    fn state_with(document: serde_json::Value) -> AppState {
        let mut state = AppState::new(&Config::default(), Theme::default());
        let loaded = WorkerResponse::DocumentLoaded {
            source: DocumentSource::Pipe { name: "test".into() },
            document,
        };
        handle_event(&mut state, &Event::WorkerResponse(loaded)).unwrap();
        state
    }

    fn type_query(state: &mut AppState, query: &str) {
        handle_event(state, &Event::SearchMode).unwrap();
        for c in query.chars() {
            handle_event(state, &Event::Char(c)).unwrap();
        }
    }

    #[test]
    fn typing_arms_one_timer_per_keystroke() {
        let mut state = state_with(json!({"a": 1}));
        handle_event(&mut state, &Event::SearchMode).unwrap();

        let (render, actions) = handle_event(&mut state, &Event::Char('a')).unwrap();
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::ArmTimer { delay: state.debounce.interval() }]
        );
        assert!(state.debounce.is_pending());
    }

    #[test]
    fn chars_are_ignored_outside_typing() {
        let mut state = state_with(json!({"a": 1}));
        let (render, actions) = handle_event(&mut state, &Event::Char('x')).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn enter_flushes_a_pending_search() {
        let mut state = state_with(json!({"apple": "apple pie"}));
        type_query(&mut state, "apple");

        handle_event(&mut state, &Event::NextMatch).unwrap();

        assert_eq!(state.search_runs, 1);
        assert_eq!(state.result_indicator().as_deref(), Some("1/2"));
        assert!(!handle_event(&mut state, &Event::DebounceElapsed).unwrap().0);
        assert_eq!(state.search_runs, 1);
    }

    #[test]
    fn backspace_to_empty_clears_highlights() {
        let mut state = state_with(json!({"a": "x"}));
        type_query(&mut state, "x");
        handle_event(&mut state, &Event::DebounceElapsed).unwrap();
        assert!(state.result_indicator().is_some());

        let (_, actions) = handle_event(&mut state, &Event::Backspace).unwrap();

        assert!(actions.is_empty());
        assert!(state.result_indicator().is_none());
        assert!(!state.debounce.is_pending());
    }

    #[test]
    fn leaving_the_search_box_keeps_highlights() {
        let mut state = state_with(json!({"a": "x", "b": "x"}));
        type_query(&mut state, "x");
        handle_event(&mut state, &Event::FocusResults).unwrap();
        handle_event(&mut state, &Event::LeaveSearchBar).unwrap();

        assert_eq!(state.input_mode, InputMode::Normal);
        handle_event(&mut state, &Event::NextMatch).unwrap();
        assert_eq!(state.result_indicator().as_deref(), Some("2/2"));

        handle_event(&mut state, &Event::Escape).unwrap();
        assert!(state.result_indicator().is_none());
        assert!(state.search_query.is_empty());
    }

    fn from_file(path: &str, document: serde_json::Value) -> Event {
        Event::WorkerResponse(WorkerResponse::DocumentLoaded {
            source: DocumentSource::File { path: path.into() },
            document,
        })
    }

    #[test]
    fn identical_file_reload_is_skipped() {
        let mut state = AppState::new(&Config::default(), Theme::default());
        handle_event(&mut state, &from_file("~/a.json", json!({"a": "x"}))).unwrap();
        type_query(&mut state, "x");
        handle_event(&mut state, &Event::NextMatch).unwrap();

        let (render, _) = handle_event(&mut state, &from_file("~/a.json", json!({"a": "x"}))).unwrap();
        assert!(!render);
        assert_eq!(state.document.revision(), 1);
        assert_eq!(state.result_indicator().as_deref(), Some("1/1"));

        // Same content from another file is a replacement.
        let (render, _) = handle_event(&mut state, &from_file("~/b.json", json!({"a": "x"}))).unwrap();
        assert!(render);
        assert_eq!(state.document.revision(), 2);
        assert!(state.result_indicator().is_none());
    }

    #[test]
    fn identical_pipe_delivery_still_replaces() {
        let mut state = state_with(json!({"a": "hello"}));
        type_query(&mut state, "hello");
        handle_event(&mut state, &Event::NextMatch).unwrap();
        handle_event(&mut state, &Event::Char('!')).unwrap();
        assert!(state.debounce.is_pending());

        let again = WorkerResponse::DocumentLoaded {
            source: DocumentSource::Pipe { name: "test".into() },
            document: json!({"a": "hello"}),
        };
        let (render, _) = handle_event(&mut state, &Event::WorkerResponse(again)).unwrap();

        assert!(render);
        assert_eq!(state.document.revision(), 2);
        assert!(!state.debounce.is_pending());
        assert!(state.result_indicator().is_none());
        assert!(state.tree.current().is_none());
    }

    #[test]
    fn reload_posts_to_worker_when_path_is_set() {
        let mut state = state_with(json!({}));
        let (_, actions) = handle_event(&mut state, &Event::ReloadDocument).unwrap();
        assert!(actions.is_empty());
        assert!(state.status.is_some());

        state.document_path = Some("~/data.json".into());
        let (_, actions) = handle_event(&mut state, &Event::ReloadDocument).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::load_document("~/data.json".to_string()))]
        );
    }

    #[test]
    fn worker_error_is_shown() {
        let mut state = state_with(json!({}));
        let error = WorkerResponse::Error { message: "boom".into() };
        handle_event(&mut state, &Event::WorkerResponse(error)).unwrap();
        assert_eq!(state.status, Some(StatusMessage::error("boom")));
    }
}
