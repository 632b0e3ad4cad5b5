//! Quiet-period debouncing for derived previews.
//!
//! Bursts of edits are coalesced: only the latest value is kept, and it is
//! released once no new value has arrived for the quiet period. The clock
//! is passed in by the caller, so the debouncer owns no timer or thread.

use std::time::{Duration, Instant};

/// Quiet period before the preview is recomputed.
pub const DEFAULT_PREVIEW_QUIET: Duration = Duration::from_millis(300);

/// Holds the latest value until input has been stable for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_QUIET)
    }
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// The configured quiet period.
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records a new value, replacing any pending one and restarting the wait.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Returns the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Returns the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Returns true if a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant at which the pending value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }
}
