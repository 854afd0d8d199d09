//! `futures-io` trait implementations for Buffer.
//!
//! The buffer lives in memory, so every poll completes immediately with the
//! same result as its blocking counterpart.

use std::io::{self, BufRead, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncBufRead, AsyncRead, AsyncWrite};

use crate::buffer::Buffer;

impl AsyncRead for Buffer {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        dst: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Read::read(self.get_mut(), dst))
    }
}

impl AsyncBufRead for Buffer {
    fn poll_fill_buf(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        Poll::Ready(BufRead::fill_buf(self.get_mut()))
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        BufRead::consume(self.get_mut(), amt);
    }
}

impl AsyncWrite for Buffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(self.get_mut().write_bytes(data)))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};

    use crate::buffer::Buffer;

    #[tokio::test]
    async fn test_async_write_then_read() {
        let mut buf = Buffer::new(0);
        buf.write_all(b"hello async").await.unwrap();

        let mut out = String::new();
        buf.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "hello async");
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_async_read_line() {
        let mut buf = Buffer::from(&b"first\nsecond"[..]);
        let mut line = String::new();
        buf.read_line(&mut line).await.unwrap();
        assert_eq!(line, "first\n");
        assert_eq!(buf.as_bytes(), b"second");
    }
}
