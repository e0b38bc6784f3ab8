use std::collections::BTreeMap;

use crate::algorithm::{DigestValue, HashAlgorithm};
use crate::engine::RoundId;

/// Digests keyed by algorithm. Absent algorithms were not recorded.
pub type DigestSet = BTreeMap<HashAlgorithm, DigestValue>;

/// Position of an entry inside a [`super::KnownStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One file from the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownEntry {
    name: String,
    size: Option<u64>,
    digests: DigestSet,
    last_used_round: Option<RoundId>,
}

impl KnownEntry {
    pub fn new(name: impl Into<String>, size: Option<u64>, digests: DigestSet) -> Self {
        Self {
            name: name.into(),
            size,
            digests,
            last_used_round: None,
        }
    }

    /// Convenience for callers holding `(algorithm, hex)` pairs.
    ///
    /// Empty digests are dropped.
    pub fn from_pairs<'a>(
        name: impl Into<String>,
        size: Option<u64>,
        pairs: impl IntoIterator<Item = (HashAlgorithm, &'a str)>,
    ) -> Self {
        let digests = pairs
            .into_iter()
            .filter_map(|(algorithm, hex)| DigestValue::new(hex).map(|value| (algorithm, value)))
            .collect();
        Self::new(name, size, digests)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn digests(&self) -> &DigestSet {
        &self.digests
    }

    pub fn digest(&self, algorithm: HashAlgorithm) -> Option<&DigestValue> {
        self.digests.get(&algorithm)
    }

    /// Round that first credited this entry, if any.
    pub fn last_used_round(&self) -> Option<RoundId> {
        self.last_used_round
    }

    pub fn is_used(&self) -> bool {
        self.last_used_round.is_some()
    }

    /// Credit the entry to `round`. The first credit sticks.
    ///
    /// Returns `true` when this call recorded the credit.
    pub(crate) fn credit(&mut self, round: RoundId) -> bool {
        if self.last_used_round.is_some() {
            return false;
        }
        self.last_used_round = Some(round);
        true
    }
}
