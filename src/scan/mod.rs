//! Input traversal and the per-file digest/classify loop.
//!
//! Walking the inputs is split from what happens to each file: audit and
//! match runs feed an [`AuditEngine`] through [`run_scan`], listing runs
//! hand every digested file to a sink through [`compute_listing`].

mod errors;
mod walk;

pub use crate::engine::InputFile;
pub use errors::ScanError;
pub use walk::visit_inputs;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::algorithm::HashAlgorithm;
use crate::digesting::{digest_file, digest_reader};
use crate::engine::{AuditEngine, EngineError, MatchVerdict};

/// Input argument that stands for standard input.
pub const STDIN_ARG: &str = "-";
/// Name standard input is listed and matched under.
pub const STDIN_NAME: &str = "stdin";

/// How inputs are walked and named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Descend into directory arguments.
    pub recursive: bool,
    /// Report names as given on the command line instead of absolute paths.
    pub relative_paths: bool,
}

/// Totals for one pass over the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Files digested and handed on.
    pub files: usize,
    /// Files that could not be read.
    pub read_errors: usize,
    /// Files whose classification failed on an inconsistent index.
    pub internal_errors: usize,
    /// Inputs and directories skipped without reading.
    pub skipped: usize,
}

/// Digest every input and classify it against the engine's known set.
///
/// A root equal to [`STDIN_ARG`] is read from `stdin`. `on_file` sees each
/// verdict, or the per-file error when the engine reported an internal
/// inconsistency for that file; reporting that error is left to `on_file`.
/// Any other engine error aborts the scan.
pub fn run_scan(
    engine: &mut AuditEngine,
    roots: &[PathBuf],
    options: &ScanOptions,
    stdin: &mut impl Read,
    on_file: &mut impl FnMut(&InputFile, Result<&MatchVerdict, &EngineError>) -> Result<(), ScanError>,
) -> Result<ScanSummary, ScanError> {
    let algorithms = engine.enabled().to_vec();
    let mut summary = ScanSummary::default();
    each_input(roots, options, &algorithms, stdin, &mut summary, &mut |file, summary| {
        match engine.process(&file) {
            Ok(verdict) => on_file(&file, Ok(&verdict)),
            Err(err) if !err.is_fatal() => {
                debug!(file = %file.name, error = %err, "Classification failed");
                summary.internal_errors += 1;
                on_file(&file, Err(&err))
            }
            Err(err) => Err(err.into()),
        }
    })?;
    debug!(?summary, "Scan finished");
    Ok(summary)
}

/// Digest every input and hand it to `sink` without classifying.
pub fn compute_listing(
    roots: &[PathBuf],
    options: &ScanOptions,
    algorithms: &[HashAlgorithm],
    stdin: &mut impl Read,
    sink: &mut impl FnMut(&InputFile) -> Result<(), ScanError>,
) -> Result<ScanSummary, ScanError> {
    let mut summary = ScanSummary::default();
    each_input(roots, options, algorithms, stdin, &mut summary, &mut |file, _| {
        sink(&file)
    })?;
    debug!(?summary, "Listing finished");
    Ok(summary)
}

/// Digest a stream that has no path, such as standard input.
pub fn digest_stream(
    name: &str,
    reader: impl Read,
    algorithms: &[HashAlgorithm],
) -> io::Result<InputFile> {
    let digested = digest_reader(reader, algorithms)?;
    Ok(InputFile {
        name: name.to_string(),
        size: Some(digested.size),
        digests: digested.digests,
    })
}

fn each_input(
    roots: &[PathBuf],
    options: &ScanOptions,
    algorithms: &[HashAlgorithm],
    stdin: &mut impl Read,
    summary: &mut ScanSummary,
    handle: &mut impl FnMut(InputFile, &mut ScanSummary) -> Result<(), ScanError>,
) -> Result<(), ScanError> {
    for root in roots {
        if root.as_os_str() == STDIN_ARG {
            match digest_stream(STDIN_NAME, &mut *stdin, algorithms) {
                Ok(file) => {
                    summary.files += 1;
                    handle(file, summary)?;
                }
                Err(err) => {
                    warn!(error = %err, "Failed to hash standard input");
                    summary.read_errors += 1;
                }
            }
            continue;
        }
        let skipped = walk::visit_inputs(std::slice::from_ref(root), options, &mut |path| {
            match read_input(path, options, algorithms, summary) {
                Some(file) => handle(file, summary),
                None => Ok(()),
            }
        })?;
        summary.skipped += skipped;
    }
    Ok(())
}

/// Name a path the way reports and listings show it.
pub fn display_name(path: &Path, relative_paths: bool) -> String {
    if relative_paths {
        return path.to_string_lossy().into_owned();
    }
    match std::path::absolute(path) {
        Ok(absolute) => absolute.to_string_lossy().into_owned(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to resolve absolute path");
            path.to_string_lossy().into_owned()
        }
    }
}

fn read_input(
    path: &Path,
    options: &ScanOptions,
    algorithms: &[HashAlgorithm],
    summary: &mut ScanSummary,
) -> Option<InputFile> {
    match digest_file(path, algorithms) {
        Ok(digested) => {
            summary.files += 1;
            Some(InputFile {
                name: display_name(path, options.relative_paths),
                size: Some(digested.size),
                digests: digested.digests,
            })
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to hash file");
            summary.read_errors += 1;
            None
        }
    }
}
