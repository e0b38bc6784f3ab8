use std::io::{self, Read, Write};

use tracing::{debug, info};

use crate::algorithm::HashAlgorithm;
use crate::config::AuditSettings;
use crate::engine::{AuditEngine, ClassifyOptions, InputFile, MatchVerdict};
use crate::known::{HashdeepWriter, KnownStore, format_record, load_known_set};
use crate::report::{AuditPrinter, PROGRAM_NAME};
use crate::scan::{self, ScanError, ScanOptions};

use super::args::{CliOptions, Mode};
use super::errors::CliError;

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    AuditFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::AuditFailed => 1,
        }
    }
}

/// Execute a parsed command line, writing listings and reports to `out`.
///
/// Command-line flags take precedence over `settings`. Inputs named `-` are
/// read from the process's standard input.
pub fn run(
    options: &CliOptions,
    settings: &AuditSettings,
    out: &mut impl Write,
) -> Result<RunStatus, CliError> {
    run_with_stdin(options, settings, &mut io::stdin().lock(), out)
}

/// [`run`] with standard input supplied by the caller.
pub fn run_with_stdin(
    options: &CliOptions,
    settings: &AuditSettings,
    stdin: &mut impl Read,
    out: &mut impl Write,
) -> Result<RunStatus, CliError> {
    let algorithms = options
        .algorithms
        .clone()
        .unwrap_or_else(|| settings.algorithm_list());
    let scan_options = ScanOptions {
        recursive: options.recursive || settings.recursive,
        relative_paths: options.relative_paths || settings.relative_paths,
    };
    info!(mode = ?options.mode, algorithms = ?algorithms, "Starting run");

    if options.mode == Mode::Compute {
        return compute(options, &algorithms, &scan_options, stdin, out);
    }

    let store = load_known_sets(options, &algorithms)?;
    let classify = ClassifyOptions {
        size_discriminator: settings.size_discriminator,
    };
    let mut engine = AuditEngine::new(store, &algorithms, classify)?;
    match options.mode {
        Mode::Audit => audit(options, engine, &scan_options, stdin, out),
        _ => {
            let negative = options.mode == Mode::MatchNegative;
            let terminator = line_terminator(options);
            scan::run_scan(
                &mut engine,
                &options.inputs,
                &scan_options,
                stdin,
                &mut |file, verdict| match verdict {
                    Ok(verdict) if is_known(verdict) != negative => {
                        let line = match_line(options, &algorithms, file);
                        write!(out, "{line}{terminator}").map_err(ScanError::Output)
                    }
                    Ok(_) => Ok(()),
                    Err(err) => {
                        report_error(options, &format!("{}: {err}", file.name));
                        Ok(())
                    }
                },
            )?;
            out.flush().map_err(CliError::Output)?;
            Ok(RunStatus::Success)
        }
    }
}

/// How a matched file is printed: its name, or with `-M`/`-X` its whole
/// record. `-z` puts the size in front of a bare name.
fn match_line(options: &CliOptions, algorithms: &[HashAlgorithm], file: &InputFile) -> String {
    if options.display_hash {
        return format_record(file, algorithms);
    }
    if options.display_size {
        let size = file.size.map(|size| size.to_string()).unwrap_or_default();
        return format!("{size:>10}  {}", file.name);
    }
    file.name.clone()
}

fn line_terminator(options: &CliOptions) -> char {
    if options.null_terminated { '\0' } else { '\n' }
}

fn compute(
    options: &CliOptions,
    algorithms: &[HashAlgorithm],
    scan_options: &ScanOptions,
    stdin: &mut impl Read,
    out: &mut impl Write,
) -> Result<RunStatus, CliError> {
    let mut writer = HashdeepWriter::start(&mut *out, algorithms, &options.invocation)?
        .with_terminator(line_terminator(options));
    scan::compute_listing(&options.inputs, scan_options, algorithms, stdin, &mut |file| {
        Ok(writer.record(file)?)
    })?;
    writer.finish()?;
    Ok(RunStatus::Success)
}

fn audit(
    options: &CliOptions,
    mut engine: AuditEngine,
    scan_options: &ScanOptions,
    stdin: &mut impl Read,
    out: &mut impl Write,
) -> Result<RunStatus, CliError> {
    let mut printer = AuditPrinter::new(&mut *out, options.verbosity);
    scan::run_scan(
        &mut engine,
        &options.inputs,
        scan_options,
        stdin,
        &mut |file, verdict| match verdict {
            Ok(verdict) => printer.file(&file.name, verdict).map_err(ScanError::Output),
            Err(err) => {
                report_error(options, &format!("{}: {err}", file.name));
                Ok(())
            }
        },
    )?;
    let report = engine.finish();
    printer.finish(&report).map_err(CliError::Output)?;
    Ok(if report.passed {
        RunStatus::Success
    } else {
        RunStatus::AuditFailed
    })
}

/// Load every `-k` file into one store.
///
/// A file that fails to load is reported and skipped; only an empty result is
/// fatal. Plain sum files take their algorithm from `-c` when exactly one is
/// enabled.
fn load_known_sets(
    options: &CliOptions,
    algorithms: &[HashAlgorithm],
) -> Result<KnownStore, CliError> {
    let hint = match algorithms {
        [only] => Some(*only),
        _ => None,
    };
    let mut store = KnownStore::new();
    for path in &options.known_files {
        if let Err(err) = load_known_set(&mut store, path, hint) {
            debug!(path = %path.display(), error = %err, "Skipping known set");
            report_error(options, &err.to_string());
        }
    }
    if store.is_empty() {
        return Err(CliError::NoKnownEntries);
    }
    Ok(store)
}

fn is_known(verdict: &MatchVerdict) -> bool {
    verdict.flags.exact || verdict.flags.moved
}

fn report_error(options: &CliOptions, message: &str) {
    if !options.silent {
        eprintln!("{PROGRAM_NAME}: {message}");
    }
}
