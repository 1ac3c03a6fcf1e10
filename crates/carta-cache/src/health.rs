//! Backend health tracking for degraded mode.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the key-value backend was seen disconnected.
///
/// Owned by one repository instance, never process-global, so parallel test
/// runs and multiple repositories cannot cross-contaminate. The flag starts
/// set: a fresh repository cannot vouch for whatever an earlier process
/// wrote, so the first operation pays a full flush before trusting the
/// backend.
///
/// The flag is intentionally best-effort under concurrency: two requests
/// observing a disconnect may both trigger a flush, which is idempotent.
#[derive(Debug)]
pub struct BackendHealth {
    was_disconnected: AtomicBool,
}

impl BackendHealth {
    /// Crea el tracker en estado desconectado.
    pub fn new() -> Self {
        Self {
            was_disconnected: AtomicBool::new(true),
        }
    }

    /// Claims the pending-flush token.
    ///
    /// Returns true at most once per disconnect episode (compare-and-swap),
    /// clearing the flag optimistically; the caller owes a `flush_all`
    /// before reusing the backend.
    pub fn take_disconnected(&self) -> bool {
        self.was_disconnected
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Records a timeout or connection failure.
    pub fn mark_disconnected(&self) {
        self.was_disconnected.store(true, Ordering::Release);
    }

    /// Returns true while a disconnect is pending recovery.
    pub fn is_disconnected(&self) -> bool {
        self.was_disconnected.load(Ordering::Acquire)
    }
}

impl Default for BackendHealth {
    fn default() -> Self {
        Self::new()
    }
}
