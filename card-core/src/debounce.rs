//! Trailing-edge debouncing of a value against an injected clock.

use std::time::{Duration, Instant};

/// A value that only takes a new input once it has been stable for `delay`.
///
/// Every [`set`](Self::set) restarts the window. Nothing sleeps: the host
/// calls [`poll`](Self::poll) with the current time and the value commits
/// once the deadline has passed.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    value: T,
    pending: Option<Pending<T>>,
    delay: Duration,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T: Clone + PartialEq> Debounced<T> {
    /// Create a debounced value that starts settled at `value`.
    #[must_use]
    pub fn new(value: T, delay: Duration) -> Self {
        Self {
            value,
            pending: None,
            delay,
        }
    }

    /// The committed value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The debounce window.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feed a new input at `now`, restarting the window.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// When the pending input commits, if one is waiting.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Check if an input is waiting for its window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any waiting input.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Commit the pending input if its deadline has passed.
    ///
    /// Returns the new value only when it differs from the old one.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        if pending.value == self.value {
            return None;
        }
        self.value = pending.value;
        Some(&self.value)
    }
}
