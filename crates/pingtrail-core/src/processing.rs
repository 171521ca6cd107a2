//! In-flight request counter behind the `processing` flags.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Advisory "request in flight" flag, shared between its owner and any
/// observers holding a clone.
///
/// Overlapping requests are counted, so the flag stays set until the last
/// one ends.
#[derive(Debug, Clone, Default)]
pub struct Processing(Arc<AtomicUsize>);

impl Processing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    /// Mark one request as started; it ends when the guard drops.
    pub(crate) fn begin(&self) -> ProcessingGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        ProcessingGuard(Arc::clone(&self.0))
    }
}

/// Ends one request when dropped, however the request ends.
#[must_use]
pub(crate) struct ProcessingGuard(Arc<AtomicUsize>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
