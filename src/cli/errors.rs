use thiserror::Error;

use crate::algorithm::UnknownAlgorithm;
use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::known::KnownSetError;
use crate::scan::ScanError;

/// Errors that end a command-line run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed command line.
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),
    /// Two requested modes cannot run together.
    #[error("{0}")]
    Conflict(&'static str),
    /// Audit or matching was requested but no known entries loaded.
    #[error("Unable to load any matching files")]
    NoKnownEntries,
    #[error(transparent)]
    KnownSet(#[from] KnownSetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
