//! Latest-wins slot for results of overlapping requests.
//!
//! Each request takes a ticket when it starts. A finished request may only
//! publish its result if no later request has started since, so a slow
//! earlier response can never overwrite a newer one. In-flight requests are
//! not cancelled; their results are just dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Sequence stamp handed out by [`LatestSlot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

pub struct LatestSlot<T> {
    issued: AtomicU64,
    committed: Mutex<Option<T>>,
}

impl<T: Clone> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            committed: Mutex::new(None),
        }
    }

    /// Start a request.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish `value` if `ticket` is still the newest. Returns whether it was stored.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut committed = self.committed.lock().unwrap_or_else(PoisonError::into_inner);

        // Checked under the lock so a stale commit cannot interleave with a fresh one.
        if ticket.0 != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(ticket = ticket.0, "discarding stale result");
            return false;
        }

        *committed = Some(value);
        true
    }

    /// The most recently committed value.
    pub fn current(&self) -> Option<T> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: Clone> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
