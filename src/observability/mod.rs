//! OpenTelemetry tracing with file-based OTLP JSON export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → FileSpanExporter → jsonscope-otlp.json
//! ```
//!
//! Traces land in `~/.local/share/zellij/jsonscope/jsonscope-otlp.json`, one
//! OTLP document per line. The file rotates at 10 MB and keeps three numbered
//! backups.
//!
//! The level comes from the `trace_level` plugin option and defaults to
//! `"info"`. Both the plugin and the worker call [`init_tracing`]; only the
//! first call per thread-local runtime takes effect.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `tracer`: exporter and tracer provider
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: size-based rotating file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME};
