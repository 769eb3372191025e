//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never touches the host directly.
//! It returns actions and `main.rs` executes them in order.
//!
//! # Example
//!
//! ```
//! use jsonscope::app::Action;
//! use jsonscope::worker::WorkerMessage;
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::ArmTimer { delay: Duration::from_millis(300) },
//!     Action::PostToWorker(WorkerMessage::load_document("~/report.json".into())),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;
use std::time::Duration;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Arms a one-shot host timer; its expiry comes back as
    /// [`Event::DebounceElapsed`](crate::app::Event::DebounceElapsed).
    ArmTimer {
        /// Time until the timer fires.
        delay: Duration,
    },
}
