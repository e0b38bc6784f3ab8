//! Digest algorithm catalogue.
//!
//! Digests are carried as lowercase hex text and compared by equality only;
//! nothing outside [`crate::digesting`] needs to know an algorithm's output
//! size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hash algorithms a known set may carry and a scan may compute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Tiger,
    Whirlpool,
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm in canonical column order.
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Tiger,
        HashAlgorithm::Whirlpool,
        HashAlgorithm::Blake3,
    ];

    /// Lowercase name used in known-set headers and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Tiger => "tiger",
            HashAlgorithm::Whirlpool => "whirlpool",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Length of the hex encoding of this algorithm's output.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Tiger => 48,
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
            HashAlgorithm::Whirlpool => 128,
        }
    }

    /// Guess the algorithm of a bare hex digest from its length.
    ///
    /// 64-character digests resolve to SHA-256; BLAKE3 sums need an explicit hint.
    pub fn infer_from_hex_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(HashAlgorithm::Md5),
            40 => Some(HashAlgorithm::Sha1),
            48 => Some(HashAlgorithm::Tiger),
            64 => Some(HashAlgorithm::Sha256),
            128 => Some(HashAlgorithm::Whirlpool),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when an algorithm name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown hash algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "tiger" => Ok(HashAlgorithm::Tiger),
            "whirlpool" => Ok(HashAlgorithm::Whirlpool),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(UnknownAlgorithm(value.trim().to_string())),
        }
    }
}

/// Parse a comma separated algorithm list such as `md5,sha256`.
///
/// Duplicates are dropped while preserving first-seen order.
pub fn parse_algorithm_list(raw: &str) -> Result<Vec<HashAlgorithm>, UnknownAlgorithm> {
    let mut out = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let algorithm = part.parse::<HashAlgorithm>()?;
        if !out.contains(&algorithm) {
            out.push(algorithm);
        }
    }
    Ok(out)
}

/// An opaque digest, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DigestValue(String);

impl DigestValue {
    /// Normalize a hex digest. Returns `None` for empty input.
    pub fn new(hex: &str) -> Option<Self> {
        let trimmed = hex.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_lowercase()))
    }

    /// Normalize a hex digest, rejecting anything that is not plain hex.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let value = Self::new(hex)?;
        value
            .0
            .bytes()
            .all(|byte| byte.is_ascii_hexdigit())
            .then_some(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
