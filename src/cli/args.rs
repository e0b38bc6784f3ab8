use std::path::PathBuf;

use crate::algorithm::{HashAlgorithm, parse_algorithm_list};
use crate::report::{PROGRAM_NAME, Verbosity};
use crate::scan::STDIN_ARG;

use super::errors::CliError;

/// What a run does with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print a hashdeep listing of the inputs.
    #[default]
    Compute,
    /// Account for every input and every known entry.
    Audit,
    /// Print inputs found in the known set.
    Match,
    /// Print inputs missing from the known set.
    MatchNegative,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub mode: Mode,
    /// Algorithms from `-c`; `None` defers to the settings file.
    pub algorithms: Option<Vec<HashAlgorithm>>,
    pub known_files: Vec<PathBuf>,
    pub recursive: bool,
    pub relative_paths: bool,
    pub silent: bool,
    pub verbosity: Verbosity,
    /// Print the full record, digests included, for matched files (`-M`/`-X`).
    pub display_hash: bool,
    /// Prefix matched files with their size (`-z`).
    pub display_size: bool,
    /// End records and matched names with NUL instead of a newline (`-0`).
    pub null_terminated: bool,
    /// Files and directories to read; `-` is standard input.
    pub inputs: Vec<PathBuf>,
    /// Arguments as given, echoed into listing headers.
    pub invocation: Vec<String>,
}

/// Parse arguments (without the program name).
///
/// Short flags may be grouped (`-rvv`), and `-c`/`-k` take their value either
/// attached (`-cmd5`) or as the next argument. Without inputs, standard
/// input is read. Returns `Ok(None)` after printing help or version text.
pub fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, CliError> {
    let mut options = CliOptions {
        invocation: std::iter::once(PROGRAM_NAME.to_string())
            .chain(args.iter().cloned())
            .collect(),
        ..CliOptions::default()
    };
    let (mut audit, mut matching, mut negative) = (false, false, false);
    let mut verbose = 0usize;
    let mut idx = 0usize;
    let mut only_inputs = false;
    while idx < args.len() {
        let arg = args[idx].as_str();
        idx += 1;
        if only_inputs || arg == STDIN_ARG || !arg.starts_with('-') {
            options.inputs.push(PathBuf::from(arg));
            continue;
        }
        match arg {
            "--" => {
                only_inputs = true;
                continue;
            }
            "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--version" => {
                println!("{}", version_text());
                return Ok(None);
            }
            _ if arg.starts_with("--") => {
                return Err(CliError::Usage(format!("Unknown argument: {arg}")));
            }
            _ => {}
        }
        let flags = &arg[1..];
        for (pos, flag) in flags.char_indices() {
            match flag {
                'a' => audit = true,
                'm' => matching = true,
                'x' => negative = true,
                'M' => {
                    matching = true;
                    options.display_hash = true;
                }
                'X' => {
                    negative = true;
                    options.display_hash = true;
                }
                'z' => options.display_size = true,
                '0' => options.null_terminated = true,
                'r' => options.recursive = true,
                'l' => options.relative_paths = true,
                's' => options.silent = true,
                'v' => verbose += 1,
                'h' => {
                    println!("{}", help_text());
                    return Ok(None);
                }
                'V' => {
                    println!("{}", version_text());
                    return Ok(None);
                }
                'c' | 'k' => {
                    let attached = &flags[pos + flag.len_utf8()..];
                    let value = if attached.is_empty() {
                        let value = args
                            .get(idx)
                            .ok_or_else(|| CliError::Usage(format!("-{flag} requires a value")))?;
                        idx += 1;
                        value.as_str()
                    } else {
                        attached
                    };
                    if flag == 'c' {
                        options.algorithms = Some(parse_algorithm_list(value)?);
                    } else {
                        options.known_files.push(PathBuf::from(value));
                    }
                    break;
                }
                unknown => {
                    return Err(CliError::Usage(format!("Unknown option: -{unknown}")));
                }
            }
        }
    }

    options.mode = select_mode(audit, matching, negative)?;
    options.verbosity = Verbosity::from_count(verbose);
    if options
        .algorithms
        .as_ref()
        .is_some_and(|algorithms| algorithms.is_empty())
    {
        return Err(CliError::Usage("-c requires at least one algorithm".into()));
    }
    if options.mode != Mode::Compute && options.known_files.is_empty() {
        return Err(CliError::Usage(
            "Audit and matching modes require at least one -k known set".into(),
        ));
    }
    if options.inputs.is_empty() {
        options.inputs.push(PathBuf::from(STDIN_ARG));
    }
    Ok(Some(options))
}

fn select_mode(audit: bool, matching: bool, negative: bool) -> Result<Mode, CliError> {
    if matching && negative {
        return Err(CliError::Conflict(
            "Regular and negative matching are mutually exclusive",
        ));
    }
    if audit && (matching || negative) {
        return Err(CliError::Conflict(
            "Audit mode cannot be combined with matching",
        ));
    }
    Ok(match (audit, matching, negative) {
        (true, _, _) => Mode::Audit,
        (_, true, _) => Mode::Match,
        (_, _, true) => Mode::MatchNegative,
        _ => Mode::Compute,
    })
}

pub fn help_text() -> String {
    [
        "hashaudit",
        "",
        "Usage:",
        "  hashaudit [-c <alg>[,<alg>...]] [-k <file>]... [-a|-m|-x|-M|-X] [-rlsz0] [-v...] [FILES]",
        "",
        "Options:",
        "  -c <algs>  Hash algorithms: md5, sha1, sha256, tiger, whirlpool, blake3",
        "  -k <file>  Load a known set (hashdeep or plain sums); repeatable",
        "  -a         Audit the inputs against the known sets",
        "  -m         Print inputs found in the known sets",
        "  -x         Print inputs not found in the known sets",
        "  -M, -X     Like -m and -x, printing each file's record with its hashes",
        "  -z         Print file sizes before matched names",
        "  -0         End listing records and matched names with NUL",
        "  -r         Recurse into directories",
        "  -l         Print names as given instead of absolute paths",
        "  -s         Silent; suppress error messages",
        "  -v         More audit detail; repeat up to three times",
        "  -h         Show this help",
        "  -V         Show the version",
        "",
        "Without -a, -m or -x the inputs are printed as a hashdeep listing.",
        "Without FILES, or for `-`, standard input is read.",
    ]
    .join("\n")
}

pub fn version_text() -> String {
    format!("{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"))
}
