use std::fmt;

use super::errors::EngineError;

/// Generation stamp issued once per input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundId(u64);

impl RoundId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly increasing round source. Wrapping is a fatal error, never reuse.
#[derive(Debug, Clone, Default)]
pub struct RoundCounter {
    issued: u64,
}

impl RoundCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start as if `issued` rounds had already been handed out.
    pub fn starting_at(issued: u64) -> Self {
        Self { issued }
    }

    pub fn next_round(&mut self) -> Result<RoundId, EngineError> {
        let next = self
            .issued
            .checked_add(1)
            .ok_or(EngineError::RoundOverflow)?;
        self.issued = next;
        Ok(RoundId(next))
    }

    /// Number of rounds issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
