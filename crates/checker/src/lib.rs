//! Compression and container format detection from magic bytes.
//!
//! This crate identifies the format of data by comparing its leading bytes
//! against a fixed table of signatures, providing:
//!
//! - **Classification** of byte slices ([`format_of_bytes`],
//!   [`FormatKind::from_magic_bytes`]) and text ([`format_of_str`])
//! - **Transparent stream detection** via [`ReadChecker`], which peeks at the
//!   head of any [`Read`]er and then hands back every byte, peeked ones
//!   included ([`format_of_reader`])
//! - **Close forwarding** to sources implementing [`Close`]
//!   ([`format_of_closable_reader`])
//!
//! Detection never decompresses anything. Checkers draw their read buffers
//! from process-wide pools, so checking the format of every request in a hot
//! path doesn't allocate once the pools are warm.

mod buffer;
mod checker;
pub mod error;
mod magic;
mod pool;
#[cfg(test)]
mod test_util;
mod util;

pub use crate::checker::{Close, ReadChecker};
pub use crate::magic::MAX_MAGIC_LEN;
use std::io::Read;

/// A recognised compression or container format.
///
/// Defaults to [`None`](Self::None), meaning no known signature matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// No known signature
    #[default]
    None,
    /// Snappy framing format (.sz)
    Snappy,
    /// Gzip compression (.gz)
    Gzip,
    /// Zstd compression (.zst)
    Zstd,
    /// Zip archive (.zip)
    Zip,
    /// Apache Parquet file (.parquet)
    Parquet,
    /// Apache Avro object container file (.avro)
    Avro,
    /// 7-Zip archive (.7z)
    SevenZip,
    /// Bzip2 compression (.bz2)
    BZip2,
    /// XZ/LZMA compression (.xz)
    Xz,
    /// RAR archive (.rar)
    Rar,
}

/// Detect the format of a byte slice from its leading bytes.
///
/// # Examples
///
/// ```
/// use compress_checker::{FormatKind, format_of_bytes};
///
/// assert_eq!(format_of_bytes(&[0x28, 0xB5, 0x2F, 0xFD, 0x04]), FormatKind::Zstd);
/// assert_eq!(format_of_bytes(b"plain text"), FormatKind::None);
/// ```
#[must_use]
pub fn format_of_bytes(info: &[u8]) -> FormatKind {
    FormatKind::from_magic_bytes(info)
}

/// Detect the format of a string's bytes, without copying them.
///
/// # Examples
///
/// ```
/// use compress_checker::{FormatKind, format_of_str};
///
/// assert_eq!(format_of_str("PAR1...."), FormatKind::Parquet);
/// assert_eq!(format_of_str(""), FormatKind::None);
/// ```
#[must_use]
pub fn format_of_str(text: &str) -> FormatKind {
    FormatKind::from_magic_bytes(text.as_bytes())
}

/// Detect the format of a reader.
///
/// Detection consumes the first few bytes of `reader`, so use the returned
/// [`ReadChecker`] for all subsequent reads; it replays those bytes first.
/// Close (or drop) the checker once done to return its buffer to the pool.
///
/// # Examples
///
/// ```
/// use compress_checker::{FormatKind, format_of_reader};
/// use std::io::Read;
///
/// let (format, mut reader) = format_of_reader(&b"BZh91AY&SY"[..]);
/// assert_eq!(format, FormatKind::BZip2);
///
/// let mut contents = String::new();
/// reader.read_to_string(&mut contents).unwrap();
/// assert_eq!(contents, "BZh91AY&SY");
/// ```
pub fn format_of_reader<R: Read>(reader: R) -> (FormatKind, ReadChecker<R>) {
    let checker = ReadChecker::new(reader);
    (checker.format(), checker)
}

/// Like [`format_of_reader`], but closing the returned checker also closes
/// `reader`.
pub fn format_of_closable_reader<R: Read + Close>(reader: R) -> (FormatKind, ReadChecker<R>) {
    let checker = ReadChecker::closable(reader);
    (checker.format(), checker)
}
