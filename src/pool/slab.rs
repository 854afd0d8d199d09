//! Bounded lock-free free-list of reusable values.

use crossbeam_queue::ArrayQueue;

/// A concurrent slab of idle values.
///
/// `pop` and `push` never block. A full slab hands the value back so the
/// caller can decide to drop it.
#[derive(Debug)]
pub(crate) struct Slab<T> {
    idle: ArrayQueue<T>,
}

impl<T> Slab<T> {
    /// Creates a slab holding at most `capacity` idle values (minimum one).
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            idle: ArrayQueue::new(capacity.max(1)),
        }
    }

    #[inline]
    pub(crate) fn pop(&self) -> Option<T> {
        self.idle.pop()
    }

    #[inline]
    pub(crate) fn push(&self, value: T) -> Result<(), T> {
        self.idle.push(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.idle.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let slab = Slab::new(2);
        assert!(slab.pop().is_none());
        assert!(slab.push(1).is_ok());
        assert!(slab.push(2).is_ok());
        assert_eq!(slab.push(3), Err(3));
        assert_eq!(slab.len(), 2);
        assert!(slab.pop().is_some());
        assert_eq!(slab.len(), 1);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let slab = Slab::new(0);
        assert!(slab.push(()).is_ok());
    }
}
