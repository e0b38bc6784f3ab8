use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;
use crate::known::KnownSetError;

/// Errors that stop a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Failed to read a file or directory.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The engine hit a condition that invalidates the whole scan.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Failed to emit a listing record.
    #[error(transparent)]
    Listing(#[from] KnownSetError),
    /// Failed to write per-file output.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
