//! Worker thread implementation for document loading.
//!
//! Reading a file from the host and parsing it can take long enough on large
//! documents to stall rendering, so both happen here. The main thread only
//! ever receives the parsed [`serde_json::Value`]. Includes distributed
//! tracing support for cross-thread observability.

use crate::domain::error::Result;
use crate::domain::DocumentSource;
use crate::infrastructure::paths;
use crate::worker::{from_json, WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker thread state for loading and parsing documents.
///
/// This struct runs on a separate thread spawned by Zellij and processes
/// messages sent from the main plugin thread.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct JsonScopeWorker {
    /// Documents parsed successfully since the worker started.
    #[serde(skip)]
    loaded: u64,
}

impl JsonScopeWorker {
    /// Helper for handling load results with consistent logging.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn read_document(path: &str) -> Result<Value> {
        let resolved = paths::sandbox_path(path);
        tracing::debug!(path = %path, resolved = %resolved, "reading document");
        let raw = std::fs::read_to_string(&resolved)?;
        Ok(from_json(&raw)?)
    }

    /// Handles the `LoadDocument` message.
    fn handle_load_document(&mut self, path: String) -> WorkerResponse {
        let result = Self::read_document(&path);
        Self::handle_result(&format!("load {path}"), result, |document| {
            self.loaded += 1;
            tracing::debug!(loaded = self.loaded, "document loaded from file");
            WorkerResponse::DocumentLoaded {
                source: DocumentSource::File { path },
                document,
            }
        })
    }

    /// Handles the `ParseDocument` message.
    fn handle_parse_document(&mut self, name: String, payload: &str) -> WorkerResponse {
        let result = from_json::<Value>(payload).map_err(Into::into);
        Self::handle_result(&format!("parse pipe {name}"), result, |document| {
            self.loaded += 1;
            tracing::debug!(loaded = self.loaded, bytes = payload.len(), "document parsed from pipe");
            WorkerResponse::DocumentLoaded {
                source: DocumentSource::Pipe { name },
                document,
            }
        })
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Reconstructs the OpenTelemetry context from the serialized trace
    /// information in the message, so spans created in the worker thread are
    /// linked to their parent spans in the main thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the appropriate response.
    ///
    /// Attaches the caller's trace context and opens a span for the operation.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonscope::worker::{JsonScopeWorker, WorkerMessage, WorkerResponse};
    ///
    /// let mut worker = JsonScopeWorker::default();
    /// let response = worker.handle_message(WorkerMessage::parse_document(
    ///     "jsonscope".to_string(),
    ///     "{\"a\": 1}".to_string(),
    /// ));
    /// assert!(matches!(response, WorkerResponse::DocumentLoaded { .. }));
    /// ```
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message");
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadDocument { path, .. } => self.handle_load_document(path),
            WorkerMessage::ParseDocument { name, payload, .. } => {
                self.handle_parse_document(name, &payload)
            }
        }
    }
}

/// Initializes tracing for the worker thread.
///
/// Same configuration as the main thread, so spans from both threads land in
/// the same file.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    let config = Config::default();
    observability::init_tracing(&config);
}

/// Tracks whether worker tracing has been initialized.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for JsonScopeWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// # Arguments
    ///
    /// * `message` - Message name used for routing the response
    /// * `payload` - JSON-serialized `WorkerMessage`
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.load(std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
            WORKER_TRACING_INITIALIZED.store(true, std::sync::atomic::Ordering::Relaxed);
        }

        let worker_message: WorkerMessage = match from_json(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => {
                let plugin_message = PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                };
                post_message_to_plugin(plugin_message);
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
            }
        }
    }
}
