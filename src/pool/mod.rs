//! Size-class bucketed buffer pooling.
//!
//! - [`BufferPool`] - Concurrent pool routing buffers by capacity
//! - [`SizeClassTable`] - The bucket capacities
//! - [`PooledBuffer`] - Guard returned by [`BufferPool::borrow`]
//! - [`PoolStats`] - Counter snapshot
//!
//! Each size class, plus one small-buffer class, is backed by its own
//! bounded lock-free slab. Counters are plain atomics.

mod borrow;
mod calibrate;
mod engine;
mod leak;
mod size_class;
mod slab;
mod stats;

pub use borrow::PooledBuffer;
pub use engine::BufferPool;
pub use size_class::SizeClassTable;
pub use stats::PoolStats;

pub(crate) use leak::LeakGuard;
