//! Match classification and audit engine.
//!
//! The engine owns the known store for the life of a scan. Building it moves
//! the store out of the loading phase, [`AuditEngine::process`] runs once per
//! input file, and [`AuditEngine::finish`] consumes the engine to produce the
//! single [`AuditReport`].

mod audit;
mod classify;
mod errors;
mod input;
mod round;

pub use audit::{AuditAggregator, AuditCounters, AuditReport};
pub use classify::{
    ClassifyOptions, HitStatus, MatchClassifier, MatchFlags, MatchOutcome, MatchVerdict,
    resolve_outcome,
};
pub use errors::EngineError;
pub use input::InputFile;
pub use round::{RoundCounter, RoundId};

use tracing::info;

use crate::algorithm::HashAlgorithm;
use crate::known::KnownStore;

/// Known store, round counter and audit totals for one scan.
#[derive(Debug)]
pub struct AuditEngine {
    store: KnownStore,
    classifier: MatchClassifier,
    rounds: RoundCounter,
    audit: AuditAggregator,
    last_recorded: Option<RecordedRound>,
}

/// The most recent round, the file classified in it and its verdict.
#[derive(Debug)]
struct RecordedRound {
    round: RoundId,
    file: InputFile,
    verdict: MatchVerdict,
}

impl AuditEngine {
    pub fn new(
        store: KnownStore,
        enabled: &[HashAlgorithm],
        options: ClassifyOptions,
    ) -> Result<Self, EngineError> {
        Self::with_rounds(store, enabled, options, RoundCounter::new())
    }

    pub fn with_rounds(
        store: KnownStore,
        enabled: &[HashAlgorithm],
        options: ClassifyOptions,
        rounds: RoundCounter,
    ) -> Result<Self, EngineError> {
        let classifier = MatchClassifier::new(enabled, options)?;
        info!(
            known = store.len(),
            algorithms = ?classifier.enabled(),
            "Audit engine ready"
        );
        Ok(Self {
            store,
            classifier,
            rounds,
            audit: AuditAggregator::new(),
            last_recorded: None,
        })
    }

    pub fn store(&self) -> &KnownStore {
        &self.store
    }

    pub fn enabled(&self) -> &[HashAlgorithm] {
        self.classifier.enabled()
    }

    /// Issue the round for the next input file.
    pub fn next_round(&mut self) -> Result<RoundId, EngineError> {
        self.rounds.next_round()
    }

    /// Classify `file` in `round` and record the verdict.
    ///
    /// Repeating the most recent round with the same file returns the recorded
    /// verdict without counting it again. Reusing it for a different file and
    /// passing an older round are both rejected.
    pub fn classify(
        &mut self,
        round: RoundId,
        file: &InputFile,
    ) -> Result<MatchVerdict, EngineError> {
        if let Some(recorded) = &self.last_recorded {
            if round == recorded.round {
                if recorded.file != *file {
                    return Err(EngineError::RoundReused {
                        round,
                        recorded: recorded.file.name.clone(),
                        file: file.name.clone(),
                    });
                }
                return Ok(recorded.verdict.clone());
            }
            if round < recorded.round {
                return Err(EngineError::StaleRound {
                    round,
                    latest: recorded.round,
                });
            }
        }
        let verdict = self.classifier.classify(&mut self.store, round, file)?;
        self.audit.record(&verdict);
        self.last_recorded = Some(RecordedRound {
            round,
            file: file.clone(),
            verdict: verdict.clone(),
        });
        Ok(verdict)
    }

    /// Issue a round and classify `file` in it.
    pub fn process(&mut self, file: &InputFile) -> Result<MatchVerdict, EngineError> {
        let round = self.next_round()?;
        self.classify(round, file)
    }

    /// Counters so far. `unused` stays zero until [`Self::finish`].
    pub fn counters(&self) -> AuditCounters {
        self.audit.summary()
    }

    pub fn finish(self) -> AuditReport {
        let report = AuditReport::build(self.audit, &self.store);
        info!(
            passed = report.passed,
            exact = report.counters.exact,
            moved = report.counters.moved,
            collision = report.counters.collision,
            unmatched = report.counters.unmatched,
            unused = report.counters.unused,
            "Audit complete"
        );
        report
    }
}
