use thiserror::Error;

use crate::algorithm::HashAlgorithm;

use super::round::RoundId;

/// Errors raised by the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A digest lookup produced a hit the classifier cannot resolve.
    ///
    /// Aborts classification of that one file; other files are unaffected.
    #[error("Internal error while matching {file} ({algorithm}): {detail}")]
    InternalInconsistency {
        /// Input file being classified.
        file: String,
        /// Algorithm whose lookup was inconsistent.
        algorithm: HashAlgorithm,
        /// What the classifier found.
        detail: String,
    },
    /// The round counter would wrap. Fatal for the whole scan.
    #[error("Too many input files")]
    RoundOverflow,
    /// Classification was requested for a round older than the last one recorded.
    #[error("Round {round} was already recorded (latest is {latest})")]
    StaleRound {
        /// Round passed by the caller.
        round: RoundId,
        /// Most recently recorded round.
        latest: RoundId,
    },
    /// The most recent round was passed again with a different file.
    #[error("Round {round} already classified {recorded}, not {file}")]
    RoundReused {
        /// Round passed by the caller.
        round: RoundId,
        /// File classified when the round was first recorded.
        recorded: String,
        /// File passed with the repeated round.
        file: String,
    },
    /// The engine was built without any enabled algorithm.
    #[error("No hash algorithms enabled for matching")]
    NoAlgorithms,
}

impl EngineError {
    /// Whether the error must stop the scan rather than just the current file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::InternalInconsistency { .. })
    }
}
