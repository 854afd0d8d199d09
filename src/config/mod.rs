//! Configuration for pool behavior.
//!
//! This module provides [`PoolConfig`], which controls:
//!
//! - The size classes (buckets) buffers are pooled by
//! - The starting default capacity handed out by [`BufferPool::get`]
//! - When and how the default capacity is recalibrated
//! - The small-buffer fast path and per-bucket retention
//! - Optional leak detection and a metrics callback
//!
//! Every field is optional. Out-of-range values are not rejected; the pool
//! falls back to the documented default instead.
//!
//! # Example
//!
//! ```
//! use bucketbuf::{BufferPool, PoolConfig};
//!
//! let config = PoolConfig::default()
//!     .with_size_classes([512, 4096, 16384])
//!     .with_initial_capacity(4096)
//!     .with_percentile(0.9);
//!
//! let pool = BufferPool::with_config(config);
//! assert_eq!(pool.default_capacity(), 4096);
//! ```
//!
//! [`BufferPool::get`]: crate::BufferPool::get

use std::fmt;
use std::sync::Arc;

use crate::pool::PoolStats;

/// Default bucket capacities: powers of two from 64 B to 64 KiB.
pub const DEFAULT_SIZE_CLASSES: [usize; 11] = [
    64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768, 65536,
];

/// Default number of returns between calibration attempts.
pub const DEFAULT_OBSERVE_EVERY: u64 = 4096;

/// Default calibration quantile.
pub const DEFAULT_PERCENTILE: f64 = 0.95;

/// Default minimum number of samples a window needs before it may recalibrate.
pub const DEFAULT_CALIBRATE_THRESHOLD: u64 = 42_000;

/// Upper bound of the default small-buffer cutoff.
pub const DEFAULT_SMALL_LIMIT: usize = 256;

/// Default number of idle buffers each sub-pool retains.
pub const DEFAULT_MAX_RETAINED: usize = 1024;

/// Callback invoked with a stats snapshot after every calibration.
pub type MetricsFn = Arc<dyn Fn(PoolStats) + Send + Sync>;

/// Configuration for a [`BufferPool`](crate::BufferPool).
///
/// Built with the `with_*` methods starting from [`PoolConfig::default`].
/// Zero values and percentiles outside `(0, 1]` mean "use the default".
#[derive(Clone)]
pub struct PoolConfig {
    size_classes: Option<Vec<usize>>,
    initial_capacity: usize,
    leak_detection: bool,
    observe_every: u64,
    small_limit: usize,
    percentile: f64,
    calibrate_threshold: u64,
    max_retained: usize,
    metrics: Option<MetricsFn>,
}

impl PoolConfig {
    /// Overrides the bucket capacities.
    ///
    /// Non-positive values are ignored; the rest are sorted and de-duplicated.
    /// If nothing remains, [`DEFAULT_SIZE_CLASSES`] is used.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::{BufferPool, PoolConfig};
    ///
    /// let pool = BufferPool::with_config(
    ///     PoolConfig::default().with_size_classes([128, 32, 0, 32]),
    /// );
    /// assert_eq!(pool.size_classes().as_slice(), &[32, 128]);
    /// ```
    pub fn with_size_classes(mut self, sizes: impl IntoIterator<Item = usize>) -> Self {
        self.size_classes = Some(sizes.into_iter().collect());
        self
    }

    /// Seeds the default capacity with the smallest class that fits `capacity`.
    ///
    /// Zero selects the smallest class.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enables or disables leak detection.
    ///
    /// When enabled, every checked-out buffer carries a tag that counts it as
    /// leaked if it is dropped instead of returned. This costs an atomic
    /// reference-count update per checkout and is meant for debugging, not
    /// for latency-sensitive paths.
    pub fn with_leak_detection(mut self, enabled: bool) -> Self {
        self.leak_detection = enabled;
        self
    }

    /// Sets how many returns happen between calibration attempts.
    pub fn with_observe_every(mut self, returns: u64) -> Self {
        self.observe_every = returns;
        self
    }

    /// Sets the capacity cutoff for the small-buffer fast path.
    pub fn with_small_limit(mut self, limit: usize) -> Self {
        self.small_limit = limit;
        self
    }

    /// Sets the calibration quantile, in `(0, 1]`.
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Sets the minimum number of samples a window needs to recalibrate.
    ///
    /// Windows below the threshold are discarded, not carried over.
    pub fn with_calibrate_threshold(mut self, samples: u64) -> Self {
        self.calibrate_threshold = samples;
        self
    }

    /// Sets how many idle buffers each sub-pool keeps before dropping returns.
    pub fn with_max_retained(mut self, buffers: usize) -> Self {
        self.max_retained = buffers;
        self
    }

    /// Registers a callback invoked after every calibration.
    ///
    /// The callback runs on the thread whose return triggered calibration and
    /// must not block.
    pub fn with_metrics<F>(mut self, callback: F) -> Self
    where
        F: Fn(PoolStats) + Send + Sync + 'static,
    {
        self.metrics = Some(Arc::new(callback));
        self
    }

    /// Returns the configured size classes, if overridden.
    pub fn size_classes(&self) -> Option<&[usize]> {
        self.size_classes.as_deref()
    }

    /// Returns the initial capacity hint.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns whether leak detection is enabled.
    pub fn leak_detection(&self) -> bool {
        self.leak_detection
    }

    /// Returns the effective observation interval.
    pub fn observe_every(&self) -> u64 {
        if self.observe_every == 0 {
            DEFAULT_OBSERVE_EVERY
        } else {
            self.observe_every
        }
    }

    /// Returns the configured small-buffer cutoff, or `None` for the default.
    ///
    /// The default depends on the size classes, so it is resolved by the pool.
    pub fn small_limit(&self) -> Option<usize> {
        (self.small_limit > 0).then_some(self.small_limit)
    }

    /// Returns the effective calibration quantile.
    pub fn percentile(&self) -> f64 {
        if self.percentile > 0.0 && self.percentile <= 1.0 {
            self.percentile
        } else {
            DEFAULT_PERCENTILE
        }
    }

    /// Returns the effective calibration sample threshold.
    pub fn calibrate_threshold(&self) -> u64 {
        if self.calibrate_threshold == 0 {
            DEFAULT_CALIBRATE_THRESHOLD
        } else {
            self.calibrate_threshold
        }
    }

    /// Returns the effective per-sub-pool retention limit.
    pub fn max_retained(&self) -> usize {
        if self.max_retained == 0 {
            DEFAULT_MAX_RETAINED
        } else {
            self.max_retained
        }
    }

    pub(crate) fn metrics(&self) -> Option<&MetricsFn> {
        self.metrics.as_ref()
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size_classes: None,
            initial_capacity: 0,
            leak_detection: false,
            observe_every: DEFAULT_OBSERVE_EVERY,
            small_limit: 0,
            percentile: DEFAULT_PERCENTILE,
            calibrate_threshold: DEFAULT_CALIBRATE_THRESHOLD,
            max_retained: DEFAULT_MAX_RETAINED,
            metrics: None,
        }
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("size_classes", &self.size_classes)
            .field("initial_capacity", &self.initial_capacity)
            .field("leak_detection", &self.leak_detection)
            .field("observe_every", &self.observe_every)
            .field("small_limit", &self.small_limit)
            .field("percentile", &self.percentile)
            .field("calibrate_threshold", &self.calibrate_threshold)
            .field("max_retained", &self.max_retained)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
