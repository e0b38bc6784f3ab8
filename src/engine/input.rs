use crate::algorithm::{DigestValue, HashAlgorithm};
use crate::known::DigestSet;

/// A freshly hashed input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Display name compared against known entry names.
    pub name: String,
    /// Byte size, when known.
    pub size: Option<u64>,
    pub digests: DigestSet,
}

impl InputFile {
    pub fn new(name: impl Into<String>, size: Option<u64>, digests: DigestSet) -> Self {
        Self {
            name: name.into(),
            size,
            digests,
        }
    }

    /// Build from `(algorithm, hex)` pairs, dropping empty digests.
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

    pub fn digest(&self, algorithm: HashAlgorithm) -> Option<&DigestValue> {
        self.digests.get(&algorithm)
    }
}
