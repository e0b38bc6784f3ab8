use tracing::debug;

use crate::known::KnownStore;

use super::classify::{MatchOutcome, MatchVerdict};

/// Running totals for an audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditCounters {
    pub exact: u64,
    pub moved: u64,
    /// Files whose only finding was a hash collision.
    pub collision: u64,
    pub unmatched: u64,
    /// Known entries never credited. Only meaningful after the audit pass.
    pub unused: u64,
}

impl AuditCounters {
    /// Collisions alone never fail an audit.
    pub fn audit_passed(&self) -> bool {
        self.unused == 0 && self.unmatched == 0 && self.moved == 0
    }

    /// Number of input files recorded.
    pub fn files_examined(&self) -> u64 {
        self.exact + self.moved + self.unmatched
    }
}

/// Accumulates per-file verdicts into [`AuditCounters`].
#[derive(Debug, Default, Clone)]
pub struct AuditAggregator {
    counters: AuditCounters,
}

impl AuditAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: &MatchVerdict) {
        match verdict.outcome {
            MatchOutcome::Exact => self.counters.exact += 1,
            MatchOutcome::Moved => self.counters.moved += 1,
            MatchOutcome::Unmatched => self.counters.unmatched += 1,
        }
        if verdict.collision_counted() {
            self.counters.collision += 1;
        }
    }

    /// Count entries never credited and store the result in the counters.
    pub fn count_unused(&mut self, store: &KnownStore) -> u64 {
        let unused = store.iter().filter(|entry| !entry.is_used()).count() as u64;
        self.counters.unused = unused;
        unused
    }

    pub fn audit_passed(&self) -> bool {
        self.counters.audit_passed()
    }

    pub fn summary(&self) -> AuditCounters {
        self.counters
    }
}

/// Final audit result. Produced once, after the last input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub counters: AuditCounters,
    /// Names of known entries no input file accounted for, in load order.
    pub unused_entries: Vec<String>,
    pub passed: bool,
}

impl AuditReport {
    pub(super) fn build(mut aggregator: AuditAggregator, store: &KnownStore) -> Self {
        aggregator.count_unused(store);
        let unused_entries: Vec<String> = store
            .iter()
            .filter(|entry| !entry.is_used())
            .map(|entry| entry.name().to_string())
            .collect();
        for name in &unused_entries {
            debug!(known = %name, "Known file not used");
        }
        let counters = aggregator.summary();
        Self {
            counters,
            unused_entries,
            passed: counters.audit_passed(),
        }
    }
}
