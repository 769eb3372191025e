//! End-to-end event flows through `handle_event`, the way the plugin drives
//! the engine: documents arrive from the worker, keys become events and
//! debounce timers fire later.

use jsonscope::app::HighlightState;
use jsonscope::domain::{DocumentSource, JsonPath};
use jsonscope::search::MatchKind;
use jsonscope::worker::WorkerResponse;
use jsonscope::{handle_event, Action, AppState, Config, Event, Theme, ViewMode};
use serde_json::{json, Value};

fn engine(config: &Config) -> AppState {
    AppState::new(config, Theme::default())
}

fn deliver(state: &mut AppState, document: Value) {
    let response = WorkerResponse::DocumentLoaded {
        source: DocumentSource::Pipe { name: "jsonscope".into() },
        document,
    };
    handle_event(state, &Event::WorkerResponse(response)).unwrap();
}

/// Enters search mode, types `query` and lets every armed timer fire.
fn search(state: &mut AppState, query: &str) {
    handle_event(state, &Event::SearchMode).unwrap();
    let mut timers = 0;
    for c in query.chars() {
        let (_, actions) = handle_event(state, &Event::Char(c)).unwrap();
        timers += actions
            .iter()
            .filter(|a| matches!(a, Action::ArmTimer { .. }))
            .count();
    }
    for _ in 0..timers {
        handle_event(state, &Event::DebounceElapsed).unwrap();
    }
}

#[test]
fn next_match_cycles_and_wraps() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"a": "hello world", "b": {"c": "HELLO"}}));
    search(&mut state, "hello");

    assert_eq!(state.result_indicator().as_deref(), Some("1/2"));
    handle_event(&mut state, &Event::FocusResults).unwrap();

    handle_event(&mut state, &Event::NextMatch).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("2/2"));

    handle_event(&mut state, &Event::NextMatch).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("1/2"));

    handle_event(&mut state, &Event::PrevMatch).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("2/2"));
    assert_eq!(state.search_runs, 1);
}

#[test]
fn key_substring_matches_without_numeric_values() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"apple": 1}));
    search(&mut state, "app");

    let current = state.highlight.cursor().current().cloned().unwrap();
    assert_eq!(current.kind, MatchKind::Key);
    assert_eq!(current.text, "apple");
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
}

#[test]
fn switching_views_keeps_the_current_match() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"a": "hello world", "b": {"c": "HELLO"}}));
    search(&mut state, "hello");
    handle_event(&mut state, &Event::NextMatch).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("2/2"));

    let (render, _) = handle_event(&mut state, &Event::ShowText).unwrap();
    assert!(render);
    assert_eq!(state.view_mode, ViewMode::Text);
    assert_eq!(state.result_indicator().as_deref(), Some("2/2"));
    assert_eq!(state.search_runs, 1);

    let printed = state.text.printed().unwrap();
    let range = state.text.current_range().cloned().unwrap();
    assert_eq!(&printed.text()[range], "HELLO");
    assert!(state.tree.current().is_none());

    handle_event(&mut state, &Event::ShowTree).unwrap();
    let (id, kind) = state.tree.current().unwrap();
    assert_eq!(kind, MatchKind::Value);
    assert_eq!(
        state.tree.node(id).unwrap().path,
        JsonPath::root().child_key("b").child_key("c")
    );
    assert!(state.text.current_range().is_none());
    assert_eq!(state.search_runs, 1);
}

#[test]
fn pattern_characters_highlight_literally_in_text() {
    let mut state = engine(&Config {
        default_view: ViewMode::Text,
        ..Config::default()
    });
    deliver(&mut state, json!({"topic": "5G+ networks"}));
    search(&mut state, "5G+");

    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
    let printed = state.text.printed().unwrap();
    let range = state.text.current_range().cloned().unwrap();
    assert_eq!(&printed.text()[range], "5G+");
}

#[test]
fn keystrokes_within_the_interval_search_once() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"alpha": "abc", "beta": "ab"}));
    handle_event(&mut state, &Event::SearchMode).unwrap();

    handle_event(&mut state, &Event::Char('a')).unwrap();
    handle_event(&mut state, &Event::Char('b')).unwrap();

    let (first, _) = handle_event(&mut state, &Event::DebounceElapsed).unwrap();
    assert!(!first);
    assert_eq!(state.search_runs, 0);

    let (second, _) = handle_event(&mut state, &Event::DebounceElapsed).unwrap();
    assert!(second);
    assert_eq!(state.search_runs, 1);
    assert_eq!(state.result_indicator().as_deref(), Some("1/2"));
}

#[test]
fn replacing_the_document_clears_highlights_and_pending_search() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"a": "hello"}));
    search(&mut state, "hello");
    handle_event(&mut state, &Event::Char('!')).unwrap();
    assert!(state.debounce.is_pending());

    deliver(&mut state, json!({"a": "hello again"}));

    assert_eq!(state.highlight.state(), HighlightState::Cleared);
    assert!(state.result_indicator().is_none());
    assert!(!state.debounce.is_pending());
    assert_eq!(state.search_query, "hello!");

    let (render, _) = handle_event(&mut state, &Event::DebounceElapsed).unwrap();
    assert!(!render);
    assert!(state.tree.current().is_none());
}

#[test]
fn empty_query_hides_the_indicator() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"a": "x"}));
    search(&mut state, "x");
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));

    handle_event(&mut state, &Event::Backspace).unwrap();
    assert!(state.result_indicator().is_none());

    search(&mut state, "   ");
    assert!(state.result_indicator().is_none());
    assert_eq!(state.highlight.state(), HighlightState::Cleared);
}

#[test]
fn tree_failure_leaves_text_view_usable() {
    let mut state = engine(&Config {
        max_tree_nodes: 2,
        ..Config::default()
    });
    deliver(&mut state, json!({"a": [1, 2, 3], "b": "needle"}));
    assert!(state.status.is_some());

    search(&mut state, "needle");
    assert!(state.tree.failure().is_some());

    handle_event(&mut state, &Event::ShowText).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
    let printed = state.text.printed().unwrap();
    let range = state.text.current_range().cloned().unwrap();
    assert_eq!(&printed.text()[range], "needle");
}

#[test]
fn escape_returns_to_a_clean_normal_mode() {
    let mut state = engine(&Config::default());
    deliver(&mut state, json!({"a": "hello"}));
    search(&mut state, "hello");
    handle_event(&mut state, &Event::LeaveSearchBar).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));

    handle_event(&mut state, &Event::Escape).unwrap();
    assert!(state.search_query.is_empty());
    assert!(state.result_indicator().is_none());
    assert!(state.tree.current().is_none());
}
