#![forbid(unsafe_code)]

//! Deadline-ordered queue of deferred work with cancellable handles.
//!
//! The controller never sleeps or spawns. Each transition step it wants to
//! run later is pushed here with an absolute deadline; the host asks for
//! [`TimerQueue::next_deadline`] and wakes the controller when it passes.
//!
//! # Invariants
//!
//! 1. Entries pop in deadline order; entries with equal deadlines pop in
//!    the order they were scheduled.
//! 2. A cancelled entry never pops.
//! 3. `TimerId`s are never reused within one queue.

use std::collections::BTreeMap;
use std::time::Duration;

use ahash::AHashMap;

/// Handle to a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Deadline-ordered queue.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Duration, u64), T>,
    deadlines: AHashMap<u64, Duration>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: AHashMap::new(),
            next_seq: 1,
        }
    }

    /// Schedule `task` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((deadline, seq), task);
        self.deadlines.insert(seq, deadline);
        TimerId(seq)
    }

    /// Cancel a pending entry, returning its task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id.0)?;
        self.entries.remove(&(deadline, id.0))
    }

    /// Cancel everything, returning the number of entries dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        self.deadlines.clear();
        n
    }

    /// Deadline of the earliest pending entry.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest entry due at or before `now`, with
    /// its deadline.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Duration, T)> {
        let (&(deadline, seq), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&seq);
        let task = self.entries.remove(&(deadline, seq))?;
        Some((TimerId(seq), deadline, task))
    }

    /// Remove every entry due at or before `now`, in firing order.
    ///
    /// Entries scheduled while the returned batch is being processed are not
    /// part of it, even if they are already due; they wait for the next call.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(TimerId, Duration, T)> {
        std::iter::from_fn(|| self.pop_due(now)).collect()
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Number of pending entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
