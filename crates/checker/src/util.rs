use crate::FormatKind;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for FormatKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for FormatKind {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl FormatKind {
    /// Every format, starting with [`None`](Self::None).
    pub const ALL: [FormatKind; 11] = [
        FormatKind::None,
        FormatKind::Snappy,
        FormatKind::Gzip,
        FormatKind::Zstd,
        FormatKind::Zip,
        FormatKind::Parquet,
        FormatKind::Avro,
        FormatKind::SevenZip,
        FormatKind::BZip2,
        FormatKind::Xz,
        FormatKind::Rar,
    ];

    /// Returns `true` for every format except [`None`](Self::None).
    #[inline]
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !matches!(self, FormatKind::None)
    }

    /// Returns the canonical display name of this format.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::None => "None",
            FormatKind::Snappy => "Snappy",
            FormatKind::Gzip => "Gzip",
            FormatKind::Zstd => "Zstd",
            FormatKind::Zip => "Zip",
            FormatKind::Parquet => "Parquet",
            FormatKind::Avro => "Avro",
            FormatKind::SevenZip => "7z",
            FormatKind::BZip2 => "Bzip2",
            FormatKind::Xz => "xz",
            FormatKind::Rar => "Rar",
        }
    }

    /// Returns the conventional file extension for this format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::None => "",
            FormatKind::Snappy => ".sz",
            FormatKind::Gzip => ".gz",
            FormatKind::Zstd => ".zst",
            FormatKind::Zip => ".zip",
            FormatKind::Parquet => ".parquet",
            FormatKind::Avro => ".avro",
            FormatKind::SevenZip => ".7z",
            FormatKind::BZip2 => ".bz2",
            FormatKind::Xz => ".xz",
            FormatKind::Rar => ".rar",
        }
    }

    /// Verify that `bytes` start with the expected magic bytes for this format.
    ///
    /// Useful for cross-checking a format learned elsewhere (a file extension,
    /// a content-type header) against actual contents. For
    /// [`None`](Self::None) this holds when no known signature matches.
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        Self::from_magic_bytes(bytes) == *self
    }
}
