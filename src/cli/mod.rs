//! Command-line front end: argument parsing and the per-mode drivers.

mod args;
mod errors;
mod run;

pub use args::{CliOptions, Mode, help_text, parse_args, version_text};
pub use errors::CliError;
pub use run::{RunStatus, run, run_with_stdin};
