use std::io::Write;

use crate::algorithm::HashAlgorithm;
use crate::engine::InputFile;

use super::errors::KnownSetError;
use super::loader::{COMMENT_PREFIX, HASHDEEP_MAGIC, HEADER_PREFIX};

/// Writes computed digests in hashdeep format so they can be loaded back as a
/// known set.
pub struct HashdeepWriter<W: Write> {
    out: W,
    algorithms: Vec<HashAlgorithm>,
    terminator: char,
}

impl<W: Write> HashdeepWriter<W> {
    /// Emit the header and invocation comments, then return a writer for records.
    pub fn start(
        mut out: W,
        algorithms: &[HashAlgorithm],
        invocation: &[String],
    ) -> Result<Self, KnownSetError> {
        let columns = algorithms
            .iter()
            .map(|algorithm| algorithm.name())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{HASHDEEP_MAGIC}").map_err(KnownSetError::Write)?;
        writeln!(out, "{HEADER_PREFIX} size,{columns},filename").map_err(KnownSetError::Write)?;
        if let Ok(cwd) = std::env::current_dir() {
            writeln!(out, "{COMMENT_PREFIX} Invoked from: {}", cwd.display())
                .map_err(KnownSetError::Write)?;
        }
        if !invocation.is_empty() {
            writeln!(out, "{COMMENT_PREFIX} $ {}", invocation.join(" "))
                .map_err(KnownSetError::Write)?;
        }
        writeln!(out, "{COMMENT_PREFIX}").map_err(KnownSetError::Write)?;
        Ok(Self {
            out,
            algorithms: algorithms.to_vec(),
            terminator: '\n',
        })
    }

    /// End each record with `terminator` instead of a newline. Header lines
    /// keep their newlines.
    pub fn with_terminator(mut self, terminator: char) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn record(&mut self, file: &InputFile) -> Result<(), KnownSetError> {
        let line = format_record(file, &self.algorithms);
        write!(self.out, "{line}{}", self.terminator).map_err(KnownSetError::Write)
    }

    pub fn finish(mut self) -> Result<W, KnownSetError> {
        self.out.flush().map_err(KnownSetError::Write)?;
        Ok(self.out)
    }
}

/// Render `file` as a `size,<digests>,name` record in `algorithms` order.
///
/// Missing sizes and digests leave their column empty.
pub fn format_record(file: &InputFile, algorithms: &[HashAlgorithm]) -> String {
    let mut line = file.size.map(|size| size.to_string()).unwrap_or_default();
    for algorithm in algorithms {
        line.push(',');
        if let Some(digest) = file.digests.get(algorithm) {
            line.push_str(digest.as_str());
        }
    }
    line.push(',');
    line.push_str(&file.name);
    line
}
