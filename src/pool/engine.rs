//! The bucketed buffer pool.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use super::borrow::PooledBuffer;
use super::calibrate::Calibrator;
use super::leak::LeakGuard;
use super::size_class::SizeClassTable;
use super::slab::Slab;
use super::stats::{Counters, PoolStats};
use crate::buffer::Buffer;
use crate::config::{DEFAULT_SMALL_LIMIT, MetricsFn, PoolConfig};

/// A concurrent pool of [`Buffer`]s bucketed by capacity.
///
/// Requests are routed by size:
///
/// - Sizes up to the small limit come from a dedicated small-buffer sub-pool
/// - Larger sizes come from the smallest size class that fits
/// - Sizes above every class get a fresh power-of-two allocation that is
///   dropped again on return
///
/// Returned buffers are reset and filed by their *current* capacity, so a
/// buffer that grew while checked out moves to a larger class. Every return
/// also feeds the calibration loop that tunes [`get`](Self::get)'s default
/// capacity toward the configured percentile of observed sizes.
///
/// All methods take `&self`; share the pool with `Arc<BufferPool>` or a plain
/// reference. There is no global lock.
///
/// # Example
///
/// ```
/// use bucketbuf::BufferPool;
///
/// let pool = BufferPool::default();
///
/// let mut buf = pool.get_sized(1000);
/// assert!(buf.capacity() >= 1000);
/// buf.write_str("payload");
/// pool.put(buf);
///
/// let stats = pool.stats();
/// assert_eq!((stats.gets, stats.puts), (1, 1));
/// ```
pub struct BufferPool {
    classes: SizeClassTable,
    buckets: Box<[Slab<Buffer>]>,
    small: Slab<Buffer>,
    small_limit: usize,
    default_capacity: AtomicUsize,
    calibrator: Calibrator,
    counters: Counters,
    leak_detection: bool,
    metrics: Option<MetricsFn>,
}

impl BufferPool {
    /// Creates a pool with default settings whose [`get`](Self::get) starts at
    /// the smallest class that fits `initial_capacity`.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(PoolConfig::default().with_initial_capacity(initial_capacity))
    }

    /// Creates a pool from a configuration.
    pub fn with_config(config: PoolConfig) -> Self {
        let classes = config
            .size_classes()
            .map(|s| SizeClassTable::new(s.iter().copied()))
            .unwrap_or_default();

        let small_limit = config
            .small_limit()
            .unwrap_or_else(|| DEFAULT_SMALL_LIMIT.min(classes.smallest()));
        let max_retained = config.max_retained();
        let buckets = (0..classes.len())
            .map(|_| Slab::new(max_retained))
            .collect();
        let calibrator = Calibrator::new(
            classes.len(),
            config.observe_every(),
            config.calibrate_threshold(),
            config.percentile(),
        );
        let default_capacity = AtomicUsize::new(classes.ceil(config.initial_capacity()));

        debug!(
            classes = ?classes.as_slice(),
            small_limit,
            default_capacity = default_capacity.load(Ordering::Relaxed),
            leak_detection = config.leak_detection(),
            "buffer pool created"
        );

        Self {
            classes,
            buckets,
            small: Slab::new(max_retained),
            small_limit,
            default_capacity,
            calibrator,
            counters: Counters::default(),
            leak_detection: config.leak_detection(),
            metrics: config.metrics().cloned(),
        }
    }

    /// Takes a buffer sized to the current default capacity.
    pub fn get(&self) -> Buffer {
        Counters::bump(&self.counters.gets);
        self.take(self.default_capacity.load(Ordering::Relaxed))
    }

    /// Takes a buffer whose capacity is at least `size`.
    ///
    /// Sizes above the largest class are served by a fresh allocation rounded
    /// up to a power of two.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds `isize::MAX` bytes, as `Vec` does.
    pub fn get_sized(&self, size: usize) -> Buffer {
        Counters::bump(&self.counters.gets);
        self.take(size)
    }

    /// Takes a buffer of at least `size` bytes wrapped in a guard that returns
    /// it to this pool when released or dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::BufferPool;
    ///
    /// let pool = BufferPool::new(64);
    /// let mut buf = pool.borrow(32);
    /// buf.write_str("data");
    /// buf.write_to(&mut std::io::sink())?;
    /// buf.release();
    ///
    /// let stats = pool.stats();
    /// assert_eq!((stats.gets, stats.puts), (1, 1));
    /// # Ok::<(), bucketbuf::BufferError>(())
    /// ```
    pub fn borrow(&self, size: usize) -> PooledBuffer<'_> {
        PooledBuffer::new(self, self.get_sized(size))
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer is reset, filed by its current capacity and counted as one
    /// calibration sample. It is dropped instead if its sub-pool is full or it
    /// outgrew the largest class.
    pub fn put(&self, mut buf: Buffer) {
        Counters::bump(&self.counters.puts);
        if let Some(guard) = buf.take_leak_guard() {
            guard.disarm();
        }
        buf.reset();

        let capacity = buf.capacity();
        let class = self.classes.index_for(capacity);
        self.observe(capacity, class);

        let slab = if capacity <= self.small_limit {
            &self.small
        } else if capacity <= self.classes[class] {
            &self.buckets[class]
        } else {
            Counters::bump(&self.counters.discards);
            debug!(capacity, "discarding buffer larger than every size class");
            return;
        };

        if slab.push(buf).is_err() {
            Counters::bump(&self.counters.discards);
            trace!(capacity, "sub-pool full, dropping returned buffer");
        }
    }

    /// Returns a buffer to the pool if there is one. `None` is a no-op.
    pub fn put_opt(&self, buf: Option<Buffer>) {
        if let Some(buf) = buf {
            self.put(buf);
        }
    }

    /// Sets the default capacity to the smallest class that fits `observed`,
    /// ignoring collected samples. Zero is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::{BufferPool, PoolConfig};
    ///
    /// let pool = BufferPool::with_config(
    ///     PoolConfig::default().with_size_classes([16, 32, 64]),
    /// );
    /// pool.calibrate(40);
    /// assert_eq!(pool.get().capacity(), 64);
    /// ```
    pub fn calibrate(&self, observed: usize) {
        if observed == 0 {
            return;
        }
        self.apply_default(self.classes.ceil(observed));
    }

    /// Returns a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        self.counters
            .snapshot(self.default_capacity(), self.small_limit)
    }

    /// Returns the number of tracked buffers dropped without being returned.
    ///
    /// Always zero unless leak detection is enabled.
    pub fn leak_count(&self) -> u64 {
        self.counters.leaks.load(Ordering::Relaxed)
    }

    /// Returns the capacity currently used by [`get`](Self::get).
    pub fn default_capacity(&self) -> usize {
        self.default_capacity.load(Ordering::Relaxed)
    }

    /// Returns the small-buffer cutoff.
    pub fn small_limit(&self) -> usize {
        self.small_limit
    }

    /// Returns the size class table.
    pub fn size_classes(&self) -> &SizeClassTable {
        &self.classes
    }

    /// Returns the number of idle buffers currently held, across sub-pools.
    pub fn retained(&self) -> usize {
        self.small.len() + self.buckets.iter().map(Slab::len).sum::<usize>()
    }

    fn take(&self, size: usize) -> Buffer {
        let mut buf = if size > self.classes.largest() {
            // No class holds buffers this large; leave the largest one warm.
            self.allocate(size.checked_next_power_of_two().unwrap_or(size))
        } else {
            let (slab, bound) = if size <= self.small_limit {
                (&self.small, self.small_limit)
            } else {
                let class = self.classes.index_for(size);
                (&self.buckets[class], self.classes[class])
            };
            slab.pop().unwrap_or_else(|| self.allocate(bound))
        };
        if size > buf.capacity() {
            buf.grow(size);
        }
        if self.leak_detection {
            buf.set_leak_guard(LeakGuard::new(Arc::clone(&self.counters.leaks)));
        }
        buf
    }

    fn allocate(&self, capacity: usize) -> Buffer {
        Counters::bump(&self.counters.allocations);
        trace!(capacity, "sub-pool miss, allocating buffer");
        Buffer::new(capacity)
    }

    fn observe(&self, capacity: usize, class: usize) {
        if capacity == 0 || !self.calibrator.record(class) {
            return;
        }
        if let Some(class) = self.calibrator.recalibrate() {
            self.apply_default(self.classes[class]);
        }
    }

    fn apply_default(&self, capacity: usize) {
        let previous = self.default_capacity.swap(capacity, Ordering::Relaxed);
        Counters::bump(&self.counters.calibrations);
        debug!(previous, capacity, "default capacity calibrated");

        if let Some(metrics) = &self.metrics {
            metrics(self.stats());
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::with_config(PoolConfig::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("classes", &self.classes.as_slice())
            .field("small_limit", &self.small_limit)
            .field("default_capacity", &self.default_capacity())
            .field("retained", &self.retained())
            .field("leak_detection", &self.leak_detection)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool() -> BufferPool {
        BufferPool::with_config(PoolConfig::default().with_size_classes([32, 64, 128]))
    }

    #[test]
    fn test_default_small_limit_follows_smallest_class() {
        assert_eq!(BufferPool::default().small_limit(), 64);
        assert_eq!(small_pool().small_limit(), 32);
        let pool = BufferPool::with_config(PoolConfig::default().with_size_classes([1024]));
        assert_eq!(pool.small_limit(), 256);
    }

    #[test]
    fn test_initial_capacity_rounds_to_class() {
        assert_eq!(BufferPool::new(0).default_capacity(), 64);
        assert_eq!(BufferPool::new(100).default_capacity(), 128);
        assert_eq!(BufferPool::new(1 << 30).default_capacity(), 65536);
    }

    #[test]
    fn test_miss_allocates_class_bound() {
        let pool = small_pool();
        let buf = pool.get_sized(40);
        assert_eq!(buf.capacity(), 64);
        assert_eq!(pool.stats().allocations, 1);
    }

    #[test]
    fn test_small_requests_use_small_slab() {
        let pool = small_pool();
        let buf = pool.get_sized(1);
        assert_eq!(buf.capacity(), 32);
        pool.put(buf);
        assert_eq!(pool.small.len(), 1);
        assert!(pool.buckets.iter().all(|b| b.len() == 0));
    }

    #[test]
    fn test_reuse_avoids_allocation() {
        let pool = small_pool();
        let buf = pool.get_sized(100);
        pool.put(buf);
        let buf = pool.get_sized(100);
        assert_eq!(buf.capacity(), 128);
        assert_eq!(pool.stats().allocations, 1);
    }

    #[test]
    fn test_oversized_return_is_discarded() {
        let pool = small_pool();
        let buf = pool.get_sized(1000);
        assert_eq!(buf.capacity(), 1024);
        pool.put(buf);
        assert_eq!(pool.retained(), 0);
        assert_eq!(pool.stats().discards, 1);
    }

    #[test]
    fn test_oversized_request_leaves_largest_class_warm() {
        let pool = small_pool();
        pool.put(pool.get_sized(128));
        assert_eq!(pool.buckets[2].len(), 1);

        let buf = pool.get_sized(1000);
        assert_eq!(buf.capacity(), 1024);
        assert_eq!(pool.buckets[2].len(), 1);
        assert_eq!(pool.stats().allocations, 2);
    }

    #[test]
    fn test_full_slab_discards() {
        let pool = BufferPool::with_config(
            PoolConfig::default()
                .with_size_classes([64])
                .with_max_retained(1),
        );
        let a = pool.get();
        let b = pool.get();
        pool.put(a);
        pool.put(b);
        assert_eq!(pool.retained(), 1);
        assert_eq!(pool.stats().discards, 1);
    }

    #[test]
    fn test_calibrate_zero_is_noop() {
        let pool = small_pool();
        pool.calibrate(0);
        assert_eq!(pool.default_capacity(), 32);
        assert_eq!(pool.stats().calibrations, 0);
    }
}
