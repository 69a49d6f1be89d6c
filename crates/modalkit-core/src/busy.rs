#![forbid(unsafe_code)]

//! "Busy until T" guard rate-limiting user actions.
//!
//! Every accepted action (trigger click, close click, overlay click, Escape)
//! claims the guard for the length of the transition it starts. Actions
//! arriving before that instant are dropped. The guard is plain data: it is
//! queried with an explicit `now`, never with the wall clock.

use std::time::Duration;

/// Rejects actions until a stored instant has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyGuard {
    until: Option<Duration>,
}

impl BusyGuard {
    /// A guard that accepts the next action.
    #[must_use]
    pub const fn new() -> Self {
        Self { until: None }
    }

    /// Whether an action at `now` would be dropped.
    #[must_use]
    pub fn is_busy(&self, now: Duration) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// The instant the current busy window ends, if one is active at `now`.
    #[must_use]
    pub fn busy_until(&self, now: Duration) -> Option<Duration> {
        self.until.filter(|until| now < *until)
    }

    /// Claim the guard for `span` starting at `now`.
    ///
    /// Returns `false` (and leaves the guard unchanged) if still busy.
    pub fn try_acquire(&mut self, now: Duration, span: Duration) -> bool {
        if self.is_busy(now) {
            return false;
        }
        self.until = Some(now.saturating_add(span));
        true
    }

    /// Forget any active window.
    pub fn reset(&mut self) {
        self.until = None;
    }
}
