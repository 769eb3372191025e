//! Quiet-interval gating of search passes.
//!
//! Zellij timers are one-shot and cannot be cancelled, so the debouncer keeps
//! a count of timers still in flight. Every keystroke arms a fresh timer; the
//! search runs only when the *last* outstanding timer fires while a search is
//! still pending. Cancelling just disarms the pending search, turning any
//! timers that fire later into no-ops.

use std::time::Duration;

/// Quiet interval used when the plugin options do not override it.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tracks a pending, debounced search.
///
/// # Example
///
/// ```
/// use jsonscope::search::Debouncer;
/// use std::time::Duration;
///
/// let mut debounce = Debouncer::new(Duration::from_millis(300));
/// debounce.schedule();
/// debounce.schedule();
///
/// assert!(!debounce.on_timer()); // first timer: a newer keystroke followed
/// assert!(debounce.on_timer());  // last timer: the query has settled
/// assert!(!debounce.is_pending());
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    outstanding: u32,
    pending: bool,
}

impl Debouncer {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            outstanding: 0,
            pending: false,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Marks a search as pending and returns the delay for the host timer
    /// that must be armed for it.
    pub fn schedule(&mut self) -> Duration {
        self.outstanding = self.outstanding.saturating_add(1);
        self.pending = true;
        self.interval
    }

    /// Drops the pending search. Timers already armed still fire but are
    /// ignored.
    pub fn cancel(&mut self) {
        if self.pending {
            tracing::debug!(outstanding = self.outstanding, "pending search cancelled");
        }
        self.pending = false;
    }

    /// Accounts for one fired timer.
    ///
    /// Returns `true` when the search should run now.
    pub fn on_timer(&mut self) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 && self.pending {
            self.pending = false;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_keystrokes_fires_once() {
        let mut debounce = Debouncer::default();
        for _ in 0..5 {
            debounce.schedule();
        }
        let fired: Vec<bool> = (0..5).map(|_| debounce.on_timer()).collect();
        assert_eq!(fired, vec![false, false, false, false, true]);
    }

    #[test]
    fn cancelled_search_never_fires() {
        let mut debounce = Debouncer::default();
        debounce.schedule();
        debounce.cancel();
        assert!(!debounce.on_timer());
        assert!(!debounce.is_pending());
    }

    #[test]
    fn keystroke_after_cancel_rearms() {
        let mut debounce = Debouncer::default();
        debounce.schedule();
        debounce.cancel();
        debounce.schedule();
        assert!(!debounce.on_timer());
        assert!(debounce.on_timer());
    }

    #[test]
    fn stray_timer_is_ignored() {
        let mut debounce = Debouncer::default();
        assert!(!debounce.on_timer());
        assert_eq!(debounce.schedule(), DEFAULT_DEBOUNCE);
        assert!(debounce.on_timer());
    }
}
