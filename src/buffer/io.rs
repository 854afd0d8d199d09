//! Standard I/O, formatting and `bytes` trait implementations for Buffer.

use std::fmt;
use std::io::{self, BufRead, Read, Write};

use bytes::Buf;

use super::Buffer;
use crate::error::BufferError;

impl Buffer {
    /// Writes all unread bytes to `sink` in a single `write` call.
    ///
    /// The read cursor advances by however many bytes the sink accepted.
    /// Returns `Ok(0)` without touching the sink when nothing is unread.
    ///
    /// # Errors
    ///
    /// - [`BufferError::ShortWrite`] if the sink accepted fewer bytes than
    ///   offered without reporting an error
    /// - [`BufferError::Io`] if the sink failed
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::Buffer;
    ///
    /// let mut buf = Buffer::new(0);
    /// buf.write_str("data");
    ///
    /// let mut out = Vec::new();
    /// assert_eq!(buf.write_to(&mut out)?, 4);
    /// assert_eq!(out, b"data");
    /// assert!(buf.is_empty());
    /// # Ok::<(), bucketbuf::BufferError>(())
    /// ```
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize, BufferError> {
        self.collapse_if_drained();
        if self.is_empty() {
            return Ok(0);
        }

        let offered = self.len();
        let written = sink
            .write(self.as_bytes())
            .map_err(|e| BufferError::io(e, 0))?
            .min(offered);
        self.advance_read(written);

        if written < offered {
            return Err(BufferError::ShortWrite { written });
        }
        Ok(written)
    }

    /// Reads from `source` until it reports end of data.
    ///
    /// Whenever the buffer is full it grows by at least 512 bytes before the
    /// next read. Interrupted reads are retried. Returns the number of bytes
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Io`] carrying the bytes appended so far if the
    /// source fails. Those bytes stay in the buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::Buffer;
    ///
    /// let mut buf = Buffer::new(0);
    /// let n = buf.read_from(&mut &b"more"[..])?;
    /// assert_eq!(n, 4);
    /// assert_eq!(buf.as_bytes(), b"more");
    /// # Ok::<(), bucketbuf::BufferError>(())
    /// ```
    pub fn read_from<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<usize, BufferError> {
        self.collapse_if_drained();
        let mut total = 0;

        loop {
            let spare = self.spare_for_read();
            match source.read(spare) {
                Ok(0) => return Ok(total),
                Ok(n) => {
                    self.commit(n);
                    total += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BufferError::io(e, total)),
            }
        }
    }
}

/// Reading consumes unread bytes. `Ok(0)` with a non-empty destination means
/// the buffer is exhausted; it has then collapsed back to empty.
impl Read for Buffer {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            self.reset();
            return Ok(0);
        }

        let unread = self.as_bytes();
        let n = dst.len().min(unread.len());
        dst[..n].copy_from_slice(&unread[..n]);
        self.advance_read(n);
        Ok(n)
    }
}

impl BufRead for Buffer {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.collapse_if_drained();
        Ok(self.as_bytes())
    }

    fn consume(&mut self, amt: usize) {
        self.advance_read(amt);
    }
}

impl Write for Buffer {
    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(data))
    }

    #[inline]
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_bytes(data);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for Buffer {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// Exposes the unread bytes to `bytes`-based decoders.
impl Buf for Buffer {
    #[inline]
    fn remaining(&self) -> usize {
        self.len()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.as_bytes()
    }

    /// # Panics
    ///
    /// Panics if `cnt` exceeds [`remaining`](Buf::remaining), per the `Buf`
    /// contract.
    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.len(),
            "cannot advance past `remaining`: {:?} <= {:?}",
            cnt,
            self.len()
        );
        self.advance_read(cnt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::storage::MIN_READ;

    /// Source that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
            let data: &'a [u8] = self.0;
            match (data.split_first(), dst.first_mut()) {
                (Some((&b, rest)), Some(slot)) => {
                    *slot = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_read_zero_length_dst_keeps_state() {
        let mut buf = Buffer::from(&b"abc"[..]);
        assert_eq!(buf.read(&mut []).unwrap(), 0);
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn test_read_from_grows_by_min_read() {
        let mut buf = Buffer::new(0);
        let n = buf.read_from(&mut Trickle(b"xyz")).unwrap();
        assert_eq!(n, 3);
        assert_eq!(buf.capacity(), MIN_READ);
        assert_eq!(buf.as_bytes(), b"xyz");
    }

    #[test]
    fn test_write_to_empty_skips_sink() {
        struct Refuse;
        impl Write for Refuse {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("must not be called"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut buf = Buffer::new(8);
        assert_eq!(buf.write_to(&mut Refuse).unwrap(), 0);
    }

    #[test]
    fn test_buf_trait_advance() {
        let mut buf = Buffer::from(&[0x00u8, 0x01, 0x02, 0x03, 0xff][..]);
        assert_eq!(buf.get_u32(), 0x0001_0203);
        assert_eq!(buf.remaining(), 1);
        assert_eq!(buf.get_u8(), 0xff);
        assert!(!buf.has_remaining());
    }

    #[test]
    fn test_bufread_lines() {
        let mut buf = Buffer::new(0);
        buf.write_str("one\ntwo\n");
        let lines: Vec<String> = buf.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_fmt_write() {
        let mut buf = Buffer::new(0);
        fmt::Write::write_fmt(&mut buf, format_args!("{}-{}", 1, 2)).unwrap();
        assert_eq!(buf.to_string(), "1-2");
    }
}
