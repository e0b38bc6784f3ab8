//! Plain-text audit output.
//!
//! Line formats follow hashdeep's audit mode so existing scripts that grep
//! for `Audit passed` or `Moved from` keep working.

use std::io::{self, Write};

use crate::engine::{AuditReport, MatchOutcome, MatchVerdict};

/// Name printed in front of run-level status lines.
pub const PROGRAM_NAME: &str = "hashaudit";

/// How much detail audit output carries, from 0 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const MAX: u8 = 3;

    /// Verbosity for `count` repetitions of `-v`, saturating at [`Self::MAX`].
    pub fn from_count(count: usize) -> Self {
        Self(count.min(Self::MAX as usize) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Counter summary after the audit result.
    pub fn shows_summary(self) -> bool {
        self.0 >= 1
    }

    /// Unmatched, moved and unused files.
    pub fn shows_problems(self) -> bool {
        self.0 >= 2
    }

    /// Every file, including exact matches.
    pub fn shows_every_file(self) -> bool {
        self.0 >= 3
    }
}

/// Writes audit lines for one run.
pub struct AuditPrinter<W: Write> {
    out: W,
    verbosity: Verbosity,
}

impl<W: Write> AuditPrinter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self { out, verbosity }
    }

    /// Print what was found for one input file.
    ///
    /// Collisions are printed at any verbosity; they are reported next to
    /// whichever outcome won.
    pub fn file(&mut self, name: &str, verdict: &MatchVerdict) -> io::Result<()> {
        match verdict.outcome {
            MatchOutcome::Exact if self.verbosity.shows_every_file() => {
                writeln!(self.out, "{name}: Ok")?;
            }
            MatchOutcome::Unmatched if self.verbosity.shows_problems() => {
                writeln!(self.out, "{name}: No match")?;
            }
            MatchOutcome::Moved if self.verbosity.shows_problems() => {
                let from = verdict.moved_from.as_deref().unwrap_or_default();
                writeln!(self.out, "{name}: Moved from {from}")?;
            }
            _ => {}
        }
        if let Some(other) = &verdict.collision_with {
            writeln!(self.out, "{name}: Hash collision with {other}")?;
        }
        Ok(())
    }

    /// Print the known-file tail, the pass/fail line and the summary.
    pub fn finish(mut self, report: &AuditReport) -> io::Result<W> {
        if self.verbosity.shows_problems() {
            for name in &report.unused_entries {
                writeln!(self.out, "{name}: Known file not used")?;
            }
        }
        let result = if report.passed { "passed" } else { "failed" };
        writeln!(self.out, "{PROGRAM_NAME}: Audit {result}")?;
        if self.verbosity.shows_summary() {
            let counters = &report.counters;
            writeln!(self.out, "          Files matched: {}", counters.exact)?;
            writeln!(self.out, "Files partially matched: {}", counters.collision)?;
            writeln!(self.out, "            Files moved: {}", counters.moved)?;
            writeln!(self.out, "        New files found: {}", counters.unmatched)?;
            writeln!(self.out, "  Known files not found: {}", counters.unused)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
