use std::collections::{BTreeMap, HashMap};

use crate::algorithm::{DigestValue, HashAlgorithm};

use super::entry::{EntryId, KnownEntry};

/// Digest → entries sharing it, for one algorithm.
///
/// Buckets keep every colliding entry in insertion order.
#[derive(Debug, Default, Clone)]
pub struct DigestIndex {
    buckets: HashMap<DigestValue, Vec<EntryId>>,
}

impl DigestIndex {
    fn push(&mut self, digest: DigestValue, id: EntryId) {
        self.buckets.entry(digest).or_default().push(id);
    }

    pub fn lookup(&self, digest: &DigestValue) -> &[EntryId] {
        self.buckets
            .get(digest)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// In-memory baseline plus one [`DigestIndex`] per algorithm.
#[derive(Debug, Default, Clone)]
pub struct KnownStore {
    entries: Vec<KnownEntry>,
    indices: BTreeMap<HashAlgorithm, DigestIndex>,
}

impl KnownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry and register it under every algorithm it carries.
    pub fn insert(&mut self, entry: KnownEntry) -> EntryId {
        let id = EntryId(self.entries.len());
        for (algorithm, digest) in entry.digests() {
            self.indices
                .entry(*algorithm)
                .or_default()
                .push(digest.clone(), id);
        }
        self.entries.push(entry);
        id
    }

    /// Entries sharing `digest` under `algorithm`; empty when unknown.
    pub fn lookup(&self, algorithm: HashAlgorithm, digest: &DigestValue) -> &[EntryId] {
        self.indices
            .get(&algorithm)
            .map(|index| index.lookup(digest))
            .unwrap_or_default()
    }

    pub fn entry(&self, id: EntryId) -> Option<&KnownEntry> {
        self.entries.get(id.0)
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> Option<&mut KnownEntry> {
        self.entries.get_mut(id.0)
    }

    pub fn index(&self, algorithm: HashAlgorithm) -> Option<&DigestIndex> {
        self.indices.get(&algorithm)
    }

    /// Algorithms that at least one entry carries a digest for.
    pub fn algorithms(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.indices.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn push_raw_index(&mut self, algorithm: HashAlgorithm, digest: DigestValue, id: EntryId) {
        self.indices.entry(algorithm).or_default().push(digest, id);
    }
}
