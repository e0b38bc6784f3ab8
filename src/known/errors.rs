use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a known file set.
#[derive(Debug, Error)]
pub enum KnownSetError {
    /// Failed to open or read the known-set file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write a listing.
    #[error("Failed to write known set: {0}")]
    Write(#[source] std::io::Error),
    /// The hashdeep header is missing its column line or is malformed.
    #[error("Invalid hashdeep header in {path}: {reason}")]
    Header {
        /// Known-set file path.
        path: PathBuf,
        /// What was wrong with the header.
        reason: String,
    },
    /// A record line could not be parsed.
    #[error("{path}:{line}: {reason}")]
    Record {
        /// Known-set file path.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },
}
