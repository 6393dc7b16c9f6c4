//! Checker Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A checker error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Reading the leading bytes of the source failed for a reason other than
    /// the source running out. The detected format must not be trusted.
    #[display("format detection failed: {_0}")]
    Detect(IoError),
    /// The wrapped source failed to close.
    #[display("failed to close source: {_0}")]
    Close(IoError),
    /// The requested format name is not recognised.
    #[display("unsupported format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Detect(_) | Self::Close(_))
    }

    /// The underlying I/O error, if this kind wraps one.
    pub fn io_error(&self) -> Option<&IoError> {
        match self {
            Self::Detect(err) | Self::Close(err) => Some(err),
            Self::UnsupportedFormat(_) => None,
        }
    }
}
