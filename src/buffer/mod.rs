//! Reusable byte buffer with an explicit growth strategy.
//!
//! This module provides [`Buffer`], a growable byte container with
//! independent read and write cursors:
//!
//! - Writes append at the write cursor; reads consume from the read cursor
//! - Growth reclaims consumed space in place before reallocating
//! - Reallocation always rounds up to the next power of two
//! - A fully drained buffer collapses back to empty and keeps its storage
//!
//! [`Buffer`] implements [`std::io::Read`], [`std::io::BufRead`],
//! [`std::io::Write`], [`std::fmt::Write`] and [`bytes::Buf`], so it can sit
//! between any reader, writer or codec without an intermediate copy.

mod storage;
mod io;

pub use storage::Buffer;
