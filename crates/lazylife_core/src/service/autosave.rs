//! Trailing-edge debounce for editor autosave.
//!
//! Time is passed in explicitly so callers can drive it from any event loop.
//!
//! # Invariants
//! - At most one value is pending; a newer push replaces it.
//! - A pending value is released only after `delay_ms` passed since the
//!   latest push, or on `flush`.

/// Delay between the last keystroke and the save.
pub const DEFAULT_AUTOSAVE_DELAY_MS: i64 = 500;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: i64,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due_at: i64,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms: delay_ms.max(0),
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }

    /// Queues `value`, superseding anything still pending.
    pub fn push(&mut self, now_ms: i64, value: T) {
        self.pending = Some(Pending {
            value,
            due_at: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Releases the pending value once its delay has elapsed.
    pub fn poll(&mut self, now_ms: i64) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| now_ms >= pending.due_at);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// Releases the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes releasable.
    pub fn due_at(&self) -> Option<i64> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY_MS)
    }
}
