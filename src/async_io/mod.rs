//! Async I/O support for [`Buffer`](crate::Buffer).
//!
//! This module implements the `futures-io` traits for `Buffer`, making it
//! runtime-agnostic and compatible with tokio (via `tokio-util::compat`),
//! async-std, smol, and other async runtimes.
//!
//! - `AsyncRead`, `AsyncBufRead` and `AsyncWrite` for `Buffer` (always ready)
//! - [`ReadFromAsync`] - Future returned by `Buffer::read_from_async`
//!
//! This module requires the `async-io` feature to be enabled.

mod fill;
mod traits;

pub use fill::ReadFromAsync;
