//! Scoped checkout guard.

use std::mem;
use std::ops::{Deref, DerefMut};

use super::engine::BufferPool;
use crate::buffer::Buffer;

/// A buffer checked out by [`BufferPool::borrow`].
///
/// Dereferences to [`Buffer`]. The buffer goes back to its pool, exactly as
/// [`BufferPool::put`] would, when the guard is [released](Self::release) or
/// dropped.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Buffer,
}

impl<'a> PooledBuffer<'a> {
    pub(crate) fn new(pool: &'a BufferPool, buffer: Buffer) -> Self {
        Self { pool, buffer }
    }

    /// Returns the buffer to the pool now.
    pub fn release(self) {
        drop(self);
    }

    /// Detaches the buffer; it will not be returned automatically.
    ///
    /// If the pool tracks leaks, the buffer must still be handed to
    /// [`BufferPool::put`] eventually or it is counted as leaked.
    pub fn into_inner(mut self) -> Buffer {
        let buffer = mem::take(&mut self.buffer);
        // Only an empty, unallocated placeholder is left behind.
        mem::forget(self);
        buffer
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(mem::take(&mut self.buffer));
    }
}
