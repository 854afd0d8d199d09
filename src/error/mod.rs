//! Error types for bucketbuf.

use std::fmt;
use std::io;

/// Errors that can occur while moving bytes between a [`Buffer`] and an
/// external reader or writer.
///
/// Both variants carry the number of bytes that were transferred before the
/// failure, so a caller can account for partial progress.
///
/// [`Buffer`]: crate::Buffer
#[derive(Debug)]
pub enum BufferError {
    /// The sink accepted fewer bytes than offered without reporting an error.
    ShortWrite {
        /// Bytes the sink actually accepted.
        written: usize,
    },

    /// The underlying reader or writer failed.
    Io {
        /// The error reported by the reader or writer.
        source: io::Error,
        /// Bytes transferred before the failure.
        transferred: usize,
    },
}

impl BufferError {
    /// Returns the number of bytes transferred before the error occurred.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketbuf::BufferError;
    ///
    /// let err = BufferError::ShortWrite { written: 2 };
    /// assert_eq!(err.transferred(), 2);
    /// ```
    pub fn transferred(&self) -> usize {
        match self {
            BufferError::ShortWrite { written } => *written,
            BufferError::Io { transferred, .. } => *transferred,
        }
    }

    /// Returns `true` if this is a short write.
    pub fn is_short_write(&self) -> bool {
        matches!(self, BufferError::ShortWrite { .. })
    }

    pub(crate) fn io(source: io::Error, transferred: usize) -> Self {
        BufferError::Io {
            source,
            transferred,
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::ShortWrite { written } => {
                write!(f, "short write: sink accepted only {} bytes", written)
            }
            BufferError::Io {
                source,
                transferred,
            } => {
                write!(f, "io error after {} bytes: {}", transferred, source)
            }
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<BufferError> for io::Error {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::ShortWrite { .. } => io::Error::new(io::ErrorKind::WriteZero, e),
            BufferError::Io { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_write_conversion() {
        let err = BufferError::ShortWrite { written: 3 };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err = BufferError::io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"), 7);
        assert_eq!(err.transferred(), 7);
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_display() {
        let err = BufferError::ShortWrite { written: 100 };
        assert!(err.to_string().contains("short write"));
        assert!(err.is_short_write());
    }
}
