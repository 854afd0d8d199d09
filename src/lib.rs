//! bucketbuf
//!
//! Reusable byte buffers and a self-calibrating, size-class bucketed pool
//! for hot I/O paths.
//!
//! `bucketbuf` keeps allocation and copying off the hot path with two pieces:
//!
//! - [`Buffer`] - a byte buffer with separate read/write cursors that reuses
//!   consumed space in place and grows in powers of two
//! - [`BufferPool`] - a concurrent pool that files buffers by capacity into
//!   size classes and tunes its default capacity from observed traffic
//!
//! The crate intentionally:
//! - does NOT act as a general-purpose allocator
//! - does NOT use global state; pools are values you construct and share
//! - does NOT lock; sub-pools are lock-free queues and counters are atomics
//!
//! # Sync
//!
//! ```
//! use bucketbuf::{BufferPool, PoolConfig};
//!
//! let pool = BufferPool::with_config(
//!     PoolConfig::default().with_size_classes([256, 1024, 4096]),
//! );
//!
//! let mut buf = pool.get_sized(600);
//! assert_eq!(buf.capacity(), 1024);
//!
//! buf.read_from(&mut &b"request bytes"[..])?;
//! let mut out = Vec::new();
//! buf.write_to(&mut out)?;
//! assert_eq!(out, b"request bytes");
//!
//! pool.put(buf);
//! # Ok::<(), bucketbuf::BufferError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use bucketbuf::BufferPool;
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(pool: &BufferPool, reader: R) -> Result<(), bucketbuf::BufferError> {
//!     let mut buf = pool.borrow(4096);
//!     let n = buf.read_from_async(reader).await?;
//!     println!("read {} bytes", n);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface
//

pub use buffer::Buffer;
pub use config::{
    DEFAULT_CALIBRATE_THRESHOLD, DEFAULT_MAX_RETAINED, DEFAULT_OBSERVE_EVERY,
    DEFAULT_PERCENTILE, DEFAULT_SIZE_CLASSES, DEFAULT_SMALL_LIMIT, MetricsFn, PoolConfig,
};
pub use error::BufferError;
pub use pool::{BufferPool, PoolStats, PooledBuffer, SizeClassTable};

#[cfg(feature = "async-io")]
pub use async_io::ReadFromAsync;
