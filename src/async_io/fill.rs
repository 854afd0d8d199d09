//! Filling a Buffer from an async reader.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::ready;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::buffer::Buffer;
use crate::error::BufferError;

pin_project! {
    /// Future that reads from an async reader into a [`Buffer`] until the
    /// reader reports end of data.
    ///
    /// Created by [`Buffer::read_from_async`]. Resolves to the number of
    /// bytes appended, or a [`BufferError::Io`] carrying the bytes appended
    /// before the failure.
    #[must_use = "futures do nothing unless polled"]
    #[derive(Debug)]
    pub struct ReadFromAsync<'a, R> {
        buffer: &'a mut Buffer,
        #[pin]
        reader: R,
        total: usize,
    }
}

impl Buffer {
    /// Asynchronously reads from `reader` until end of data.
    ///
    /// Grows exactly like [`read_from`](Buffer::read_from). Pass `&mut reader`
    /// to keep using the reader afterwards.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use bucketbuf::Buffer;
    /// use tokio_util::compat::TokioAsyncReadCompatExt;
    ///
    /// let file = tokio::fs::File::open("data.bin").await?;
    /// let mut buf = Buffer::new(0);
    /// let n = buf.read_from_async(file.compat()).await?;
    /// ```
    pub fn read_from_async<R: AsyncRead>(&mut self, reader: R) -> ReadFromAsync<'_, R> {
        self.collapse_if_drained();
        ReadFromAsync {
            buffer: self,
            reader,
            total: 0,
        }
    }
}

impl<R: AsyncRead> Future for ReadFromAsync<'_, R> {
    type Output = Result<usize, BufferError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            let spare = this.buffer.spare_for_read();
            match ready!(this.reader.as_mut().poll_read(cx, spare)) {
                Ok(0) => return Poll::Ready(Ok(*this.total)),
                Ok(n) => {
                    this.buffer.commit(n);
                    *this.total += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Poll::Ready(Err(BufferError::io(e, *this.total))),
            }
        }
    }
}
