//! Background worker thread for document loading.
//!
//! Reading and parsing a large document can take long enough to stall the
//! plugin's render loop, so both happen on a Zellij worker. The plugin only
//! receives the parsed [`serde_json::Value`].
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::JsonScopeWorker;
pub use messages::{from_json, TraceContext, WorkerMessage, WorkerResponse};
