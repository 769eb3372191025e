//! Worker request handling against real files, and the responses fed back
//! into the engine.

use std::fs;

use jsonscope::domain::DocumentSource;
use jsonscope::worker::{JsonScopeWorker, WorkerMessage, WorkerResponse};
use jsonscope::{handle_event, AppState, Config, Event, Theme};
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn loads_a_document_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "data.json", r#"{"users": [{"name": "ada"}]}"#);

    let mut worker = JsonScopeWorker::default();
    let response = worker.handle_message(WorkerMessage::load_document(path.clone()));

    assert_eq!(
        response,
        WorkerResponse::DocumentLoaded {
            source: DocumentSource::File { path },
            document: json!({"users": [{"name": "ada"}]}),
        }
    );
}

#[test]
fn invalid_json_on_disk_is_an_error_response() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{\"users\": [");

    let mut worker = JsonScopeWorker::default();
    let response = worker.handle_message(WorkerMessage::load_document(path.clone()));

    let WorkerResponse::Error { message } = response else {
        panic!("expected an error response");
    };
    assert!(message.starts_with(&format!("load {path}: JSON parse error")));
}

#[test]
fn missing_file_is_an_error_response() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json").to_string_lossy().into_owned();

    let mut worker = JsonScopeWorker::default();
    let response = worker.handle_message(WorkerMessage::load_document(path.clone()));

    let WorkerResponse::Error { message } = response else {
        panic!("expected an error response");
    };
    assert!(message.starts_with(&format!("load {path}: IO error")));
}

#[test]
fn loaded_file_becomes_the_searchable_document() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "data.json", r#"{"greeting": "hello", "farewell": "bye"}"#);

    let mut worker = JsonScopeWorker::default();
    let response = worker.handle_message(WorkerMessage::load_document(path.clone()));

    let mut state = AppState::new(&Config::default(), Theme::default());
    handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
    assert_eq!(state.document.revision(), 1);
    assert_eq!(
        state.status.as_ref().map(|s| s.text.as_str()),
        Some(format!("Loaded {path}").as_str())
    );

    handle_event(&mut state, &Event::SearchMode).unwrap();
    for c in "bye".chars() {
        handle_event(&mut state, &Event::Char(c)).unwrap();
    }
    handle_event(&mut state, &Event::NextMatch).unwrap();
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));

    // An unchanged file reloaded from disk keeps the search in place.
    let again = worker.handle_message(WorkerMessage::load_document(path));
    let (render, _) = handle_event(&mut state, &Event::WorkerResponse(again)).unwrap();
    assert!(!render);
    assert_eq!(state.document.revision(), 1);
    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
}

#[test]
fn failed_load_keeps_the_previous_document() {
    let mut state = AppState::new(&Config::default(), Theme::default());
    let mut worker = JsonScopeWorker::default();

    let piped = worker.handle_message(WorkerMessage::parse_document(
        "jsonscope".to_string(),
        r#"{"a": 1}"#.to_string(),
    ));
    handle_event(&mut state, &Event::WorkerResponse(piped)).unwrap();

    let failed = worker.handle_message(WorkerMessage::parse_document(
        "jsonscope".to_string(),
        "nope".to_string(),
    ));
    handle_event(&mut state, &Event::WorkerResponse(failed)).unwrap();

    assert_eq!(state.document.get(), Some(&json!({"a": 1})));
    assert_eq!(
        state.document.source(),
        Some(&DocumentSource::Pipe { name: "jsonscope".into() })
    );
    assert!(state.status.unwrap().text.starts_with("parse pipe jsonscope"));
}

#[test]
fn deeply_nested_file_is_loaded_and_searchable() {
    let depth = 1_000;
    let dir = TempDir::new().unwrap();
    let text = format!("{}{{\"key\": \"needle\"}}{}", "[".repeat(depth), "]".repeat(depth));
    let path = write(&dir, "deep.json", &text);

    let mut worker = JsonScopeWorker::default();
    let response = worker.handle_message(WorkerMessage::load_document(path));
    let wire = serde_json::to_string(&response).unwrap();
    let received = WorkerResponse::from_wire(&wire);
    assert!(matches!(received, WorkerResponse::DocumentLoaded { .. }));

    let mut state = AppState::new(&Config::default(), Theme::default());
    handle_event(&mut state, &Event::WorkerResponse(received)).unwrap();
    assert_eq!(state.document.revision(), 1);

    handle_event(&mut state, &Event::SearchMode).unwrap();
    for c in "needle".chars() {
        handle_event(&mut state, &Event::Char(c)).unwrap();
    }
    handle_event(&mut state, &Event::NextMatch).unwrap();

    assert_eq!(state.result_indicator().as_deref(), Some("1/1"));
    let current = state.highlight.cursor().current().unwrap();
    assert_eq!(current.path.len(), depth + 1);
}
