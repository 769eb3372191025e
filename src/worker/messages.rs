//! Worker thread message types for cross-thread communication.
//!
//! Requests carry a serialized trace context so spans opened in the worker
//! link back to the plugin span that posted them.

use crate::domain::DocumentSource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parses JSON text with no limit on nesting depth.
///
/// `serde_json` stops at 128 levels by default. Here the limit is lifted and
/// the stack grows on the heap as the parser descends, so depth is bounded
/// by memory only. Used for documents and for every message crossing the
/// worker boundary, since a response embeds the document one level deeper.
///
/// # Errors
///
/// Returns the parse error for invalid JSON or trailing characters.
///
/// # Example
///
/// ```
/// use jsonscope::worker::from_json;
/// use serde_json::Value;
///
/// let text = format!("{}1{}", "[".repeat(300), "]".repeat(300));
/// let value: Value = from_json(&text).unwrap();
/// assert!(value.is_array());
/// ```
pub fn from_json<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jsonscope::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("trace {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        let context = Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        };
        tracing::trace!(
            trace_id = %context.trace_id,
            parent_span_id = %context.parent_span_id,
            "capturing trace context"
        );
        Some(context)
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the current
/// trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_document(LoadDocument { path: String }),
    parse_document(ParseDocument { name: String, payload: String }),
}

/// Messages sent from the main thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read a JSON file from the host filesystem and parse it.
    LoadDocument {
        /// File path; a leading `~` is expanded against the host home.
        path: String,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Parse a JSON payload that arrived through a pipe.
    ParseDocument {
        /// Pipe the payload arrived on.
        name: String,

        /// Raw JSON text.
        payload: String,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context carried by any variant.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadDocument { trace_context, .. } | Self::ParseDocument { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A document was read and parsed.
    DocumentLoaded {
        /// Where the document came from.
        source: DocumentSource,

        /// The parsed document.
        document: Value,
    },

    /// Loading or parsing failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    /// Decodes a response received from the worker.
    ///
    /// A payload that cannot be decoded becomes an [`WorkerResponse::Error`],
    /// so the failure reaches the status line instead of vanishing.
    #[must_use]
    pub fn from_wire(payload: &str) -> Self {
        from_json(payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, payload_len = payload.len(), "unreadable worker response");
            Self::Error {
                message: format!("Unreadable worker response: {e}"),
            }
        })
    }
}
