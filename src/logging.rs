//! Diagnostics for the command-line tool.
//!
//! Diagnostics go to stderr so stdout stays a clean listing or report. The
//! level follows the command line: `-s` keeps only errors and `-vvv` adds
//! progress messages, while `RUST_LOG` overrides both. Setting
//! `HASHAUDIT_LOG_FILE` also keeps a timestamped copy under the app logs
//! directory, of which only the newest few survive.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;
use crate::report::Verbosity;

/// Environment variable that turns on the per-run log file.
pub const LOG_FILE_ENV: &str = "HASHAUDIT_LOG_FILE";

const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "hashaudit_";
const LOG_FILE_SUFFIX: &str = "log";

static INSTALLED: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No suitable directory available for logs: {0}")]
    LogDir(#[from] app_dirs::AppDirError),
    #[error("Failed to open log file in {path}: {source}")]
    OpenFile { path: PathBuf, source: InitError },
    /// Failed to enumerate existing log files for pruning.
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// What the run asked of its diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogOptions {
    /// `-s` was given.
    pub silent: bool,
    pub verbosity: Verbosity,
    /// Keep a log file in the app logs directory.
    pub keep_file: bool,
}

impl LogOptions {
    /// Options for a run, with the log file decided by [`LOG_FILE_ENV`].
    pub fn for_run(silent: bool, verbosity: Verbosity) -> Self {
        let keep_file = std::env::var_os(LOG_FILE_ENV)
            .is_some_and(|value| !value.is_empty() && value != "0");
        Self {
            silent,
            verbosity,
            keep_file,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.silent {
            "error"
        } else if self.verbosity.shows_every_file() {
            "info"
        } else {
            "warn"
        }
    }
}

/// Install the global subscriber. Returns the log file path when one was opened.
///
/// Subsequent calls are no-ops. Failures are returned so the caller can carry
/// on without diagnostics.
pub fn init(options: &LogOptions) -> Result<Option<PathBuf>, LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(None);
    }

    let timer = build_timer();
    let (file_writer, guard, log_path) = if options.keep_file {
        let dir = app_dirs::logs_dir()?;
        let (writer, guard, path) = open_log_file(&dir, now_local_or_utc())?;
        prune_old_logs(&dir, MAX_LOG_FILES)?;
        (Some(writer), Some(guard), Some(path))
    } else {
        (None, None, None)
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));
    let stderr_layer = fmt::layer()
        .with_timer(timer.clone())
        .with_writer(std::io::stderr);
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(timer)
            .with_writer(writer)
    });

    let subscriber = Registry::default()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = INSTALLED.set(guard);

    if let Some(path) = &log_path {
        tracing::debug!(path = %path.display(), "Logging to file");
    }
    Ok(log_path)
}

fn open_log_file(
    dir: &Path,
    now: OffsetDateTime,
) -> Result<(NonBlocking, WorkerGuard, PathBuf), LoggingError> {
    let stem = log_file_stem(now)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|source| LoggingError::OpenFile {
            path: dir.to_path_buf(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((writer, guard, dir.join(format!("{stem}.{LOG_FILE_SUFFIX}"))))
}

/// Keep the newest `max_files` logs. Names carry the launch time, so name
/// order is age order; files not written by this tool are left alone.
fn prune_old_logs(dir: &Path, max_files: usize) -> Result<(), LoggingError> {
    let mut names = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_log_file_name(name))
        .collect::<Vec<_>>();
    if names.len() <= max_files {
        return Ok(());
    }
    names.sort();
    let excess = names.len() - max_files;
    for name in &names[..excess] {
        let path = dir.join(name);
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn is_log_file_name(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX)
        && name
            .strip_suffix(LOG_FILE_SUFFIX)
            .is_some_and(|rest| rest.ends_with('.'))
}

fn log_file_stem(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}{stamp}"))
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
