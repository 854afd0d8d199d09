//! The Buffer type: storage, cursors, growth and compaction.

use std::fmt;

use bytes::Bytes;

use crate::pool::LeakGuard;

/// Minimum number of bytes made available per read when filling from a source.
pub(crate) const MIN_READ: usize = 512;

/// A reusable byte buffer with separate read and write cursors.
///
/// The backing storage is a single contiguous allocation whose size is the
/// buffer's [capacity](Buffer::capacity). Bytes in `[read, write)` are
/// *unread*; bytes before the read cursor have been consumed and are reclaimed
/// lazily by the next write that needs room.
///
/// # Growth
///
/// When `n` more bytes are needed, the buffer tries, in order:
///
/// 1. collapsing to empty if every written byte has been consumed
/// 2. the free space already available after the write cursor
/// 3. shifting unread bytes to the front (no allocation)
/// 4. a new allocation sized to the next power of two of `unread + n`
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use bucketbuf::Buffer;
///
/// let mut buf = Buffer::new(8);
/// buf.write_str("abcdefgh");
///
/// let mut head = [0u8; 3];
/// buf.read(&mut head)?;
/// assert_eq!(&head, b"abc");
///
/// // Reuses the consumed prefix instead of reallocating.
/// buf.write_str("XYZ");
/// assert_eq!(buf.capacity(), 8);
/// assert_eq!(buf.as_bytes(), b"defghXYZ");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Buffer {
    /// Backing storage; its length is the buffer capacity.
    buf: Vec<u8>,
    /// Write cursor.
    len: usize,
    /// Read cursor, always `<= len`.
    pos: usize,
    /// Set while a leak-tracking pool has this buffer checked out.
    leak: Option<LeakGuard>,
}

impl Buffer {
    /// Creates an empty buffer with exactly `capacity` bytes of storage.
    ///
    /// A capacity of zero performs no allocation.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `isize::MAX` bytes, as `Vec` does.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            len: 0,
            pos: 0,
            leak: None,
        }
    }

    /// Returns the unread bytes.
    ///
    /// The slice aliases the buffer's storage; no copy is made.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    /// Returns every written byte, including ones already consumed by reads.
    ///
    /// Mutating the returned slice mutates the buffer.
    #[inline]
    pub fn raw_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    /// Returns every written byte, including ones already consumed by reads.
    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Returns the unread bytes as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns the UTF-8 error if the unread bytes are not valid text. Use the
    /// [`Display`](fmt::Display) impl for a lossy conversion.
    pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Copies the unread bytes into an immutable [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }

    /// Returns the number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len - self.pos
    }

    /// Returns `true` if there are no unread bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.len
    }

    /// Returns the total size of the backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the free space after the write cursor.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Discards all content while keeping the storage for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
        self.pos = 0;
    }

    /// Ensures there is room for `n` more bytes without changing the content.
    ///
    /// `grow(0)` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity exceeds `isize::MAX` bytes, as `Vec`
    /// does.
    pub fn grow(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.collapse_if_drained();

        if self.buf.len() - self.len >= n {
            return;
        }

        let unread = self.len - self.pos;
        let required = unread.saturating_add(n);

        if self.pos > 0 && required <= self.buf.len() {
            self.buf.copy_within(self.pos..self.len, 0);
            self.len = unread;
            self.pos = 0;
            return;
        }

        let new_cap = required
            .checked_next_power_of_two()
            .unwrap_or(required);
        let mut next = vec![0u8; new_cap];
        next[..unread].copy_from_slice(&self.buf[self.pos..self.len]);
        self.buf = next;
        self.len = unread;
        self.pos = 0;
    }

    /// Appends `n` bytes and returns them for in-place filling.
    ///
    /// The returned region may hold stale bytes from earlier use of the
    /// storage; callers are expected to overwrite all of it. `reserve(0)`
    /// returns an empty slice and does not allocate.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::Buffer;
    ///
    /// let mut buf = Buffer::new(0);
    /// buf.reserve(3).copy_from_slice(&[1, 2, 3]);
    /// assert_eq!(buf.as_bytes(), &[1, 2, 3]);
    /// ```
    pub fn reserve(&mut self, n: usize) -> &mut [u8] {
        if n == 0 {
            return &mut [];
        }
        self.grow(n);
        let start = self.len;
        self.len += n;
        &mut self.buf[start..self.len]
    }

    /// Appends a byte slice, returning the number of bytes written.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        self.reserve(data.len()).copy_from_slice(data);
        data.len()
    }

    /// Appends a single byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.grow(1);
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Appends UTF-8 text, returning the number of bytes written.
    pub fn write_str(&mut self, s: &str) -> usize {
        self.write_bytes(s.as_bytes())
    }

    /// Collapses a fully consumed buffer back to empty.
    #[inline]
    pub(crate) fn collapse_if_drained(&mut self) {
        if self.pos >= self.len {
            self.reset();
        }
    }

    /// Advances the read cursor by up to `n` bytes.
    pub(crate) fn advance_read(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.len);
        self.collapse_if_drained();
    }

    /// Returns the free space after the write cursor, growing by at least
    /// [`MIN_READ`] first when there is none.
    pub(crate) fn spare_for_read(&mut self) -> &mut [u8] {
        if self.len == self.buf.len() {
            self.grow(MIN_READ);
        }
        &mut self.buf[self.len..]
    }

    /// Marks `n` bytes of the spare region as written.
    pub(crate) fn commit(&mut self, n: usize) {
        self.len = (self.len + n).min(self.buf.len());
    }

    pub(crate) fn set_leak_guard(&mut self, guard: LeakGuard) {
        self.leak = Some(guard);
    }

    pub(crate) fn take_leak_guard(&mut self) -> Option<LeakGuard> {
        self.leak.take()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<Vec<u8>> for Buffer {
    /// Adopts the vector's allocation; its contents become unread bytes.
    fn from(mut data: Vec<u8>) -> Self {
        let len = data.len();
        let cap = data.capacity();
        data.resize(cap, 0);
        Self {
            buf: data,
            len,
            pos: 0,
            leak: None,
        }
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        let mut buf = Self::new(data.len());
        buf.write_bytes(data);
        buf
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("read_pos", &self.pos)
            .field("tracked", &self.leak.is_some())
            .finish()
    }
}

/// Writes the unread bytes as text, replacing invalid UTF-8.
impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_exact_capacity() {
        assert_eq!(Buffer::new(0).capacity(), 0);
        assert_eq!(Buffer::new(100).capacity(), 100);
        assert!(Buffer::new(100).is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_grow_beyond_isize_max_panics() {
        let mut buf = Buffer::new(0);
        buf.grow(usize::MAX);
    }

    #[test]
    fn test_grow_fast_path_keeps_storage() {
        let mut buf = Buffer::new(16);
        buf.write_str("abcd");
        buf.grow(12);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn test_grow_compacts_before_reallocating() {
        let mut buf = Buffer::new(8);
        buf.write_str("abcdefgh");
        buf.advance_read(6);
        buf.grow(5);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.pos, 0);
        assert_eq!(buf.as_bytes(), b"gh");
    }

    #[test]
    fn test_grow_reallocates_to_power_of_two() {
        let mut buf = Buffer::new(8);
        buf.write_str("abcdefgh");
        buf.advance_read(2);
        buf.grow(5);
        // 6 unread + 5 = 11 -> 16
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.as_bytes(), b"cdefgh");
        assert_eq!(buf.pos, 0);
    }

    #[test]
    fn test_grow_zero_is_noop() {
        let mut buf = Buffer::new(0);
        buf.grow(0);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.reserve(0).is_empty());
        assert_eq!(buf.write_bytes(&[]), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_drained_buffer_collapses_on_write() {
        let mut buf = Buffer::new(4);
        buf.write_str("abcd");
        buf.advance_read(4);
        assert_eq!(buf.len, 0);

        buf.write_str("wxyz");
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.as_bytes(), b"wxyz");
    }

    #[test]
    fn test_write_byte_grows_from_empty() {
        let mut buf = Buffer::new(0);
        buf.write_byte(b'x');
        assert_eq!(buf.capacity(), 1);
        buf.write_byte(b'y');
        assert_eq!(buf.capacity(), 2);
        buf.write_byte(b'z');
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.as_bytes(), b"xyz");
    }

    #[test]
    fn test_raw_bytes_include_consumed_prefix() {
        let mut buf = Buffer::new(4);
        buf.write_bytes(&[1, 2, 3]);
        buf.advance_read(1);
        assert_eq!(buf.raw_bytes(), &[1, 2, 3]);
        buf.raw_bytes_mut()[1] = 9;
        assert_eq!(buf.as_bytes(), &[9, 3]);
    }

    #[test]
    fn test_from_vec_adopts_allocation() {
        let mut v = Vec::with_capacity(32);
        v.extend_from_slice(b"hello");
        let buf = Buffer::from(v);
        assert_eq!(buf.as_bytes(), b"hello");
        assert!(buf.capacity() >= 32);
    }

    #[test]
    fn test_display_is_lossy() {
        let buf = Buffer::from(&b"ok\xff"[..]);
        assert_eq!(buf.to_string(), "ok\u{fffd}");
        assert!(buf.to_str().is_err());
    }
}
