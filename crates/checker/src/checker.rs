//! Transparent format detection over a live stream.

use crate::FormatKind;
use crate::buffer::PooledBufReader;
use crate::error::{Error, ErrorKind, Result};
use crate::magic::MAX_MAGIC_LEN;
use crate::pool::{POOL_RETAIN_LIMIT, Pool, Recycle};
use std::io::{self, BufRead, Read};
use std::sync::atomic::{AtomicBool, Ordering};

/// A source that holds something which must be explicitly released.
///
/// Sources passed to [`ReadChecker::closable`] are closed when the checker
/// is closed (or dropped). Plain [`Read`] sources are never closed by the
/// checker; they are simply dropped along with it.
pub trait Close {
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Close + ?Sized> Close for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Close + ?Sized> Close for &mut T {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

static DETECTIONS: Pool<Box<Detection>> = Pool::new(POOL_RETAIN_LIMIT);

/// Everything a check learns about its source, plus the closed gate. Pooled
/// so that binding a new checker doesn't allocate.
struct Detection {
    window: [u8; MAX_MAGIC_LEN],
    window_len: usize,
    kind: FormatKind,
    error: Option<Error>,
    closed: AtomicBool,
}

impl Recycle for Box<Detection> {
    fn create() -> Self {
        Box::new(Detection {
            window: [0; MAX_MAGIC_LEN],
            window_len: 0,
            kind: FormatKind::None,
            error: None,
            closed: AtomicBool::new(false),
        })
    }

    fn reset(&mut self) {
        self.window = [0; MAX_MAGIC_LEN];
        self.window_len = 0;
        self.kind = FormatKind::None;
        self.error = None;
        self.closed.store(false, Ordering::Release);
    }
}

/// Detects the format of a stream while leaving the stream intact.
///
/// Binding peeks at the first [`MAX_MAGIC_LEN`] bytes of the source and
/// classifies them. Reading from the checker afterwards yields the source's
/// bytes from the very first one, peeked bytes included, so the checker can
/// stand in for the source it wraps.
///
/// The read buffer and the detection record are drawn from process-wide
/// pools. [`close`](Self::close) hands the buffer back; dropping the checker
/// hands back the rest.
///
/// # Example
///
/// ```
/// use compress_checker::{FormatKind, ReadChecker};
/// use std::io::Read;
///
/// let data: &[u8] = &[0x1F, 0x8B, 0x08, 0x00, 0x00];
/// let mut checker = ReadChecker::new(data);
/// assert_eq!(checker.format(), FormatKind::Gzip);
///
/// let mut all = Vec::new();
/// checker.read_to_end(&mut all).unwrap();
/// assert_eq!(all, data);
/// checker.close().unwrap();
/// ```
pub struct ReadChecker<R> {
    reader: PooledBufReader<R>,
    /// Only `None` while dropping.
    detection: Option<Box<Detection>>,
    closer: Option<fn(&mut R) -> io::Result<()>>,
}

impl<R: Read> ReadChecker<R> {
    /// Bind a checker to a source that needs no explicit release.
    pub fn new(reader: R) -> Self {
        Self::bind(reader, None)
    }

    /// Bind a checker to a source that is closed along with the checker.
    pub fn closable(reader: R) -> Self
    where
        R: Close,
    {
        Self::bind(reader, Some(<R as Close>::close))
    }

    fn bind(reader: R, closer: Option<fn(&mut R) -> io::Result<()>>) -> Self {
        let mut reader = PooledBufReader::new(reader);
        let mut detection = DETECTIONS.acquire();
        match reader.peek(MAX_MAGIC_LEN) {
            Ok(window) => {
                detection.window[..window.len()].copy_from_slice(window);
                detection.window_len = window.len();
                detection.kind = FormatKind::from_magic_bytes(window);
                tracing::trace!(format = %detection.kind, peeked = window.len(), "classified stream");
            },
            Err(err) => {
                tracing::debug!(error = %err, "failed to read stream header");
                detection.error = Some(exn::Exn::from(ErrorKind::Detect(err)));
            },
        }
        Self { reader, detection: Some(detection), closer }
    }
}

impl<R> ReadChecker<R> {
    /// The detected format. [`FormatKind::None`] when nothing matched, and
    /// also when detection failed (see [`err`](Self::err)).
    pub fn format(&self) -> FormatKind {
        self.detection.as_ref().map_or(FormatKind::None, |d| d.kind)
    }

    /// Returns `true` if a known signature was found.
    pub fn is_compressed(&self) -> bool {
        self.format().is_compressed()
    }

    /// The detected format together with the detection error, if any.
    pub fn check(&self) -> (FormatKind, Option<&Error>) {
        (self.format(), self.err())
    }

    /// The I/O error that stopped detection, if any. Running out of data
    /// before [`MAX_MAGIC_LEN`] bytes is not an error.
    pub fn err(&self) -> Option<&Error> {
        self.detection.as_ref().and_then(|d| d.error.as_ref())
    }

    /// The leading bytes the format was detected from. Shorter than
    /// [`MAX_MAGIC_LEN`] only when the source was.
    pub fn peeked(&self) -> &[u8] {
        match &self.detection {
            Some(d) => &d.window[..d.window_len],
            None => &[],
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.detection.as_ref().is_none_or(|d| d.closed.load(Ordering::Acquire))
    }

    /// Release the read buffer and close the source if it is closable.
    ///
    /// Only the first call does anything; later calls return `Ok(())`. The
    /// buffer goes back to its pool even if closing the source fails. Reads
    /// after closing fail.
    pub fn close(&mut self) -> Result<()> {
        self.release().map_err(|err| exn::Exn::from(ErrorKind::Close(err)))
    }

    fn release(&mut self) -> io::Result<()> {
        let Some(detection) = self.detection.as_deref() else {
            return Ok(());
        };
        if detection.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.reader.recycle();
        match self.closer {
            Some(close) => close(self.reader.get_mut()),
            None => Ok(()),
        }
    }
}

impl<R: Read> Read for ReadChecker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read> BufRead for ReadChecker<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl<R> Close for ReadChecker<R> {
    fn close(&mut self) -> io::Result<()> {
        self.release().map_err(|err| io::Error::new(err.kind(), ErrorKind::Close(err)))
    }
}

impl<R> Drop for ReadChecker<R> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(error = %err, "failed to close source while dropping checker");
        }
        if let Some(detection) = self.detection.take() {
            DETECTIONS.release(detection);
        }
    }
}

impl<R> std::fmt::Debug for ReadChecker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadChecker")
            .field("format", &self.format())
            .field("peeked", &self.peeked())
            .field("buffered", &self.reader.buffer().len())
            .field("error", &self.err().map(|err| (**err).to_string()))
            .field("closed", &self.is_closed())
            .field("closable", &self.closer.is_some())
            .finish()
    }
}
