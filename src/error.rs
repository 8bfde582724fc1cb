//! Error types for fieldedit.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine operations.
///
/// Only storage-level failures surface as errors; the affected edit is
/// rejected and prior text/selection state is preserved. Out-of-range
/// offsets passed to selection or hit-testing APIs are clamped, never
/// reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edit would push the text past the configured maximum length.
    TextOverflow { requested: usize, max: usize },
    /// The text buffer could not grow to the requested size.
    AllocationFailed { requested: usize },
    /// An optional platform hook is not implemented in this build.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextOverflow { requested, max } => {
                write!(f, "text length {requested} exceeds maximum {max}")
            }
            Self::AllocationFailed { requested } => {
                write!(f, "failed to grow text buffer to {requested} bytes")
            }
            Self::Unsupported(what) => write!(f, "operation not supported: {what}"),
        }
    }
}

impl std::error::Error for Error {}
