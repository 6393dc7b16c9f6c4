//! A buffered reader whose storage is borrowed from a process-wide pool.
//!
//! Works like [`std::io::BufReader`], with two additions needed for format
//! detection: [`peek`](PooledBufReader::peek) fills the buffer up to a given
//! length without consuming anything, and
//! [`recycle`](PooledBufReader::recycle) hands the storage back to the pool
//! before the reader itself goes away.

use crate::pool::{POOL_RETAIN_LIMIT, Pool, Recycle};
use std::io::{self, BufRead, ErrorKind as IoErrorKind, Read};

/// Capacity of every pooled buffer.
pub(crate) const BUFFER_CAPACITY: usize = 4096;

static BUFFERS: Pool<Buffer> = Pool::new(POOL_RETAIN_LIMIT);

/// Backing storage for a [`PooledBufReader`]. `data[pos..filled]` holds the
/// bytes read from the source that haven't been consumed yet.
pub(crate) struct Buffer {
    data: Box<[u8]>,
    pos: usize,
    filled: usize,
}

impl Recycle for Buffer {
    fn create() -> Self {
        Self { data: vec![0; BUFFER_CAPACITY].into_boxed_slice(), pos: 0, filled: 0 }
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}

impl Buffer {
    fn available(&self) -> &[u8] {
        &self.data[self.pos..self.filled]
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }

    /// Move unconsumed bytes to the front so the tail has room to fill.
    fn compact(&mut self) {
        if self.pos > 0 {
            self.data.copy_within(self.pos..self.filled, 0);
            self.filled -= self.pos;
            self.pos = 0;
        }
    }
}

fn recycled() -> io::Error {
    io::Error::other("reader is closed")
}

pub(crate) struct PooledBufReader<R> {
    inner: R,
    buf: Option<Buffer>,
}

impl<R> PooledBufReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, buf: Some(BUFFERS.acquire()) }
    }

    /// Bytes buffered but not yet consumed. Empty once recycled.
    pub(crate) fn buffer(&self) -> &[u8] {
        match &self.buf {
            Some(buf) => buf.available(),
            None => &[],
        }
    }

    pub(crate) fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Return the buffer to the pool. Reads afterwards fail. Calling this
    /// more than once does nothing.
    pub(crate) fn recycle(&mut self) {
        if let Some(buf) = self.buf.take() {
            BUFFERS.release(buf);
        }
    }
}

impl<R: Read> PooledBufReader<R> {
    /// Fill the buffer until at least `len` unconsumed bytes are available or
    /// the source runs out, then return up to `len` of them without
    /// consuming anything.
    ///
    /// Running out of data is not an error; the returned slice is just
    /// shorter. Interrupted reads are retried. Any other error is returned,
    /// but bytes read before it stay buffered for later reads.
    pub(crate) fn peek(&mut self, len: usize) -> io::Result<&[u8]> {
        let Some(buf) = self.buf.as_mut() else {
            return Err(recycled());
        };
        let len = len.min(BUFFER_CAPACITY);
        if buf.data.len() - buf.pos < len {
            buf.compact();
        }
        while buf.filled - buf.pos < len {
            match self.inner.read(&mut buf.data[buf.filled..]) {
                Ok(0) => break,
                Ok(n) => buf.filled += n,
                Err(err) if err.kind() == IoErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        let end = buf.filled.min(buf.pos + len);
        Ok(&buf.data[buf.pos..end])
    }
}

impl<R: Read> Read for PooledBufReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let Some(buf) = self.buf.as_mut() else {
            return Err(recycled());
        };
        // Nothing buffered and a large destination: skip the copy.
        if buf.pos == buf.filled && out.len() >= BUFFER_CAPACITY {
            buf.reset();
            return self.inner.read(out);
        }
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for PooledBufReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let Some(buf) = self.buf.as_mut() else {
            return Err(recycled());
        };
        if buf.pos == buf.filled {
            buf.reset();
            buf.filled = self.inner.read(&mut buf.data)?;
        }
        Ok(buf.available())
    }

    fn consume(&mut self, amt: usize) {
        if let Some(buf) = self.buf.as_mut() {
            buf.consume(amt);
        }
    }
}

impl<R> Drop for PooledBufReader<R> {
    fn drop(&mut self) {
        self.recycle();
    }
}
