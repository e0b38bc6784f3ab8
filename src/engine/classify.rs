//! Per-file match classification.
//!
//! Every enabled algorithm is looked up independently. Each hit is resolved to
//! a [`HitStatus`], the per-algorithm signals are OR-ed together, and a single
//! [`MatchOutcome`] is chosen with the precedence `exact > no match > moved`.
//! Collisions are reported alongside whatever outcome wins.

use tracing::trace;

use crate::algorithm::{DigestValue, HashAlgorithm};
use crate::known::{EntryId, KnownEntry, KnownStore};

use super::errors::EngineError;
use super::input::InputFile;
use super::round::RoundId;

/// Resolved verdict for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Digest and name agree with a known entry.
    Exact,
    /// Digest agrees with a known entry recorded under another name.
    Moved,
    /// Nothing in the known set explains the file.
    Unmatched,
}

/// Signals aggregated across all consulted algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFlags {
    pub exact: bool,
    pub moved: bool,
    pub collision: bool,
    /// Every consulted algorithm came back empty.
    pub no_match: bool,
}

/// Classification result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchVerdict {
    pub outcome: MatchOutcome,
    pub flags: MatchFlags,
    /// Known entry the file appears to have been moved from.
    pub moved_from: Option<String>,
    /// Known entry the file collides with.
    pub collision_with: Option<String>,
}

impl MatchVerdict {
    pub fn has_collision(&self) -> bool {
        self.flags.collision
    }

    /// A collision is only tallied when it is the file's sole finding.
    pub fn collision_counted(&self) -> bool {
        self.flags.collision && !self.flags.exact && !self.flags.moved && !self.flags.no_match
    }
}

/// How a single digest hit relates to the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitStatus {
    /// Same name, no stronger discriminator disagrees.
    Match,
    /// Same content, different name.
    NameMismatch,
    /// Digest agrees but the recorded size does not.
    SizeMismatch,
    /// Digest agrees but another algorithm both sides carry does not.
    PartialMatch,
}

/// Options controlling how hits are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Treat a size disagreement as a collision.
    pub size_discriminator: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            size_discriminator: true,
        }
    }
}

/// Classifies input files against a [`KnownStore`].
#[derive(Debug, Clone)]
pub struct MatchClassifier {
    enabled: Vec<HashAlgorithm>,
    options: ClassifyOptions,
}

impl MatchClassifier {
    /// `enabled` must be non-empty; duplicates are dropped.
    pub fn new(enabled: &[HashAlgorithm], options: ClassifyOptions) -> Result<Self, EngineError> {
        let mut algorithms = Vec::with_capacity(enabled.len());
        for algorithm in enabled {
            if !algorithms.contains(algorithm) {
                algorithms.push(*algorithm);
            }
        }
        if algorithms.is_empty() {
            return Err(EngineError::NoAlgorithms);
        }
        Ok(Self {
            enabled: algorithms,
            options,
        })
    }

    pub fn enabled(&self) -> &[HashAlgorithm] {
        &self.enabled
    }

    pub fn options(&self) -> ClassifyOptions {
        self.options
    }

    /// Classify `file` within `round`.
    ///
    /// Entries are credited only once the whole file resolved cleanly, so an
    /// [`EngineError::InternalInconsistency`] leaves the store untouched.
    pub fn classify(
        &self,
        store: &mut KnownStore,
        round: RoundId,
        file: &InputFile,
    ) -> Result<MatchVerdict, EngineError> {
        let mut flags = MatchFlags::default();
        let mut consulted = 0usize;
        let mut empty_lookups = 0usize;
        let mut touched: Vec<EntryId> = Vec::new();
        let mut moved_from: Option<EntryId> = None;
        let mut collision_with: Option<EntryId> = None;

        for &algorithm in &self.enabled {
            let Some(digest) = file.digest(algorithm) else {
                continue;
            };
            consulted += 1;
            let hits = store.lookup(algorithm, digest);
            if hits.is_empty() {
                empty_lookups += 1;
                continue;
            }
            for &id in hits {
                let entry = store.entry(id).ok_or_else(|| EngineError::InternalInconsistency {
                    file: file.name.clone(),
                    algorithm,
                    detail: format!("index references missing entry #{}", id.index()),
                })?;
                if entry.last_used_round() == Some(round) || touched.contains(&id) {
                    continue;
                }
                let status = self.resolve_hit(entry, file, algorithm, digest)?;
                trace!(
                    file = %file.name,
                    known = entry.name(),
                    %algorithm,
                    ?status,
                    "Digest hit"
                );
                match status {
                    HitStatus::Match => {
                        flags.exact = true;
                        touched.push(id);
                    }
                    HitStatus::NameMismatch => {
                        flags.moved = true;
                        moved_from = moved_from.or(Some(id));
                    }
                    HitStatus::SizeMismatch | HitStatus::PartialMatch => {
                        flags.collision = true;
                        collision_with = collision_with.or(Some(id));
                    }
                }
            }
        }
        flags.no_match = consulted > 0 && empty_lookups == consulted;

        let outcome = resolve_outcome(flags);
        for id in touched {
            if let Some(entry) = store.entry_mut(id) {
                entry.credit(round);
            }
        }
        let name_of = |id: Option<EntryId>| {
            id.and_then(|id| store.entry(id))
                .map(|entry| entry.name().to_string())
        };
        Ok(MatchVerdict {
            outcome,
            flags,
            moved_from: name_of(moved_from),
            collision_with: name_of(collision_with),
        })
    }

    fn resolve_hit(
        &self,
        entry: &KnownEntry,
        file: &InputFile,
        algorithm: HashAlgorithm,
        digest: &DigestValue,
    ) -> Result<HitStatus, EngineError> {
        if entry.digest(algorithm) != Some(digest) {
            return Err(EngineError::InternalInconsistency {
                file: file.name.clone(),
                algorithm,
                detail: format!("index returned '{}' without a matching digest", entry.name()),
            });
        }
        if self.options.size_discriminator
            && let (Some(known), Some(observed)) = (entry.size(), file.size)
            && known != observed
        {
            return Ok(HitStatus::SizeMismatch);
        }
        let disagrees = self
            .enabled
            .iter()
            .filter(|other| **other != algorithm)
            .any(|other| match (entry.digest(*other), file.digest(*other)) {
                (Some(known), Some(observed)) => known != observed,
                _ => false,
            });
        if disagrees {
            return Ok(HitStatus::PartialMatch);
        }
        if entry.name() == file.name {
            Ok(HitStatus::Match)
        } else {
            Ok(HitStatus::NameMismatch)
        }
    }
}

/// `exact` beats `no_match` beats `moved`; no signal at all is unmatched.
pub fn resolve_outcome(flags: MatchFlags) -> MatchOutcome {
    if flags.exact {
        MatchOutcome::Exact
    } else if flags.no_match {
        MatchOutcome::Unmatched
    } else if flags.moved {
        MatchOutcome::Moved
    } else {
        MatchOutcome::Unmatched
    }
}
