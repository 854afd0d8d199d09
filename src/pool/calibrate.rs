//! Online percentile calibration of the default capacity.
//!
//! Every returned buffer records one hit against its size class. After each
//! `observe_every` returns, the hit counters are swapped to zero and the
//! class holding the configured percentile of that window becomes the new
//! default capacity.
//!
//! Windows with fewer than `threshold` samples are discarded outright; they
//! are not carried into the next window. Under concurrent returns the
//! per-class swaps are not collectively atomic, so a window may mix samples
//! from adjacent windows. That only skews the estimate.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use tracing::trace;

#[derive(Debug)]
pub(crate) struct Calibrator {
    hits: Box<[CachePadded<AtomicU64>]>,
    observed: CachePadded<AtomicU64>,
    observe_every: u64,
    threshold: u64,
    percentile: f64,
}

impl Calibrator {
    pub(crate) fn new(classes: usize, observe_every: u64, threshold: u64, percentile: f64) -> Self {
        Self {
            hits: (0..classes).map(|_| CachePadded::new(AtomicU64::new(0))).collect(),
            observed: CachePadded::new(AtomicU64::new(0)),
            observe_every: observe_every.max(1),
            threshold,
            percentile,
        }
    }

    /// Records one sample for `class`. Returns `true` when a window closed.
    #[inline]
    pub(crate) fn record(&self, class: usize) -> bool {
        if let Some(hits) = self.hits.get(class) {
            hits.fetch_add(1, Ordering::Relaxed);
        }
        let total = self.observed.fetch_add(1, Ordering::Relaxed) + 1;
        total % self.observe_every == 0
    }

    /// Drains the current window and returns the class index holding the
    /// target percentile, or `None` if the window is too sparse.
    pub(crate) fn recalibrate(&self) -> Option<usize> {
        let counts: Vec<u64> = self
            .hits
            .iter()
            .map(|h| h.swap(0, Ordering::Relaxed))
            .collect();
        let total: u64 = counts.iter().sum();

        if total == 0 || total < self.threshold {
            trace!(total, threshold = self.threshold, "calibration window discarded");
            return None;
        }
        percentile_index(&counts, total, self.percentile)
    }
}

/// Returns the first index whose cumulative count reaches
/// `floor(total * percentile)`, using `total` when that rounds to zero.
pub(crate) fn percentile_index(counts: &[u64], total: u64, percentile: f64) -> Option<usize> {
    let mut target = (total as f64 * percentile) as u64;
    if target == 0 {
        target = total;
    }

    let mut cumulative = 0u64;
    for (i, &count) in counts.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_index() {
        let counts = [10, 80, 10];
        assert_eq!(percentile_index(&counts, 100, 0.95), Some(2));
        assert_eq!(percentile_index(&counts, 100, 0.90), Some(1));
        assert_eq!(percentile_index(&counts, 100, 0.05), Some(0));
    }

    #[test]
    fn test_percentile_target_rounds_to_zero() {
        // 1 * 0.5 floors to 0 and is clamped up to the total.
        assert_eq!(percentile_index(&[0, 1], 1, 0.5), Some(1));
    }

    #[test]
    fn test_window_closes_every_interval() {
        let cal = Calibrator::new(3, 4, 1, 0.95);
        assert!(!cal.record(0));
        assert!(!cal.record(0));
        assert!(!cal.record(1));
        assert!(cal.record(2));
        assert!(!cal.record(2));
    }

    #[test]
    fn test_sparse_window_is_discarded() {
        let cal = Calibrator::new(2, 1, 10, 0.95);
        for _ in 0..9 {
            cal.record(1);
        }
        assert_eq!(cal.recalibrate(), None);

        // The 9 samples are gone; one more does not reach the threshold.
        cal.record(1);
        assert_eq!(cal.recalibrate(), None);
    }

    #[test]
    fn test_recalibrate_picks_heavy_class() {
        let cal = Calibrator::new(3, 1, 10, 0.95);
        for _ in 0..2 {
            cal.record(0);
        }
        for _ in 0..18 {
            cal.record(2);
        }
        assert_eq!(cal.recalibrate(), Some(2));
        // Counters were drained.
        assert_eq!(cal.recalibrate(), None);
    }
}
