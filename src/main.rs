//! `hashaudit` command-line entry point.

use std::io::Write;
use std::process::ExitCode;

use hashaudit::cli::{self, CliError};
use hashaudit::config::{self, AuditSettings};
use hashaudit::logging::{self, LogOptions};
use hashaudit::report::PROGRAM_NAME;

fn main() -> ExitCode {
    let options = match cli::parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(options)) => options,
        Ok(None) => return ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{PROGRAM_NAME}: {err}");
            if matches!(err, CliError::Usage(_) | CliError::Conflict(_)) {
                eprintln!("Try `{PROGRAM_NAME} -h` for more information.");
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(&LogOptions::for_run(options.silent, options.verbosity))
        && !options.silent
    {
        eprintln!("{PROGRAM_NAME}: Logging disabled: {err}");
    }

    let settings = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Using default settings");
        AuditSettings::default()
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = cli::run(&options, &settings, &mut out);
    let _ = out.flush();
    match result {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            if !options.silent {
                eprintln!("{PROGRAM_NAME}: {err}");
            }
            ExitCode::FAILURE
        }
    }
}
