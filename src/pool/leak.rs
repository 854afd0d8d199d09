//! Leak tagging for checked-out buffers.
//!
//! A [`LeakGuard`] rides inside a [`Buffer`](crate::Buffer) while it is
//! checked out of a pool with leak detection enabled. Returning the buffer
//! disarms the guard; dropping the buffer anywhere else counts one leak.
//!
//! This is diagnostics only. Buffers that are never dropped (`mem::forget`,
//! reference cycles, still alive at exit) are never counted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

#[derive(Debug)]
pub(crate) struct LeakGuard {
    leaks: Option<Arc<AtomicU64>>,
}

impl LeakGuard {
    pub(crate) fn new(leaks: Arc<AtomicU64>) -> Self {
        Self { leaks: Some(leaks) }
    }

    /// Drops the guard without counting a leak.
    pub(crate) fn disarm(mut self) {
        self.leaks = None;
    }
}

impl Drop for LeakGuard {
    fn drop(&mut self) {
        if let Some(leaks) = self.leaks.take() {
            let total = leaks.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(total, "pooled buffer dropped without being returned");
        }
    }
}
