//! Pool counters and their snapshot type.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// A point-in-time snapshot of pool counters.
///
/// Counters are read individually, so a snapshot taken while other threads
/// use the pool may mix slightly different moments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers handed out.
    pub gets: u64,
    /// Buffers returned.
    pub puts: u64,
    /// Buffers constructed because a sub-pool was empty.
    pub allocations: u64,
    /// Default capacity changes, automatic or manual.
    pub calibrations: u64,
    /// Tracked buffers dropped without being returned.
    pub leaks: u64,
    /// Returned buffers dropped because their sub-pool was full or they
    /// outgrew every class.
    pub discards: u64,
    /// Capacity currently used by [`BufferPool::get`](crate::BufferPool::get).
    pub default_capacity: usize,
    /// Capacity cutoff of the small-buffer fast path.
    pub small_limit: usize,
}

impl PoolStats {
    /// Fraction of gets served without allocating (0.0 to 1.0).
    pub fn reuse_ratio(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.gets.saturating_sub(self.allocations) as f64 / self.gets as f64
        }
    }
}

/// Shared atomic counters, each on its own cache line.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) gets: CachePadded<AtomicU64>,
    pub(crate) puts: CachePadded<AtomicU64>,
    pub(crate) allocations: CachePadded<AtomicU64>,
    pub(crate) calibrations: CachePadded<AtomicU64>,
    pub(crate) discards: CachePadded<AtomicU64>,
    /// Shared with every outstanding leak guard.
    pub(crate) leaks: Arc<AtomicU64>,
}

impl Counters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, default_capacity: usize, small_limit: usize) -> PoolStats {
        PoolStats {
            gets: self.gets.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            calibrations: self.calibrations.load(Ordering::Relaxed),
            leaks: self.leaks.load(Ordering::Relaxed),
            discards: self.discards.load(Ordering::Relaxed),
            default_capacity,
            small_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse_ratio() {
        let stats = PoolStats {
            gets: 10,
            allocations: 2,
            ..PoolStats::default()
        };
        assert!((stats.reuse_ratio() - 0.8).abs() < f64::EPSILON);
        assert_eq!(PoolStats::default().reuse_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot() {
        let counters = Counters::default();
        Counters::bump(&counters.gets);
        Counters::bump(&counters.gets);
        Counters::bump(&counters.puts);
        let stats = counters.snapshot(128, 64);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.puts, 1);
        assert_eq!(stats.default_capacity, 128);
        assert_eq!(stats.small_limit, 64);
    }
}
