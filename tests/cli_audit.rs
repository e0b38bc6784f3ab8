use std::fs;
use std::path::Path;

use hashaudit::cli::{CliError, RunStatus, parse_args, run};
use hashaudit::config::AuditSettings;
use tempfile::tempdir;

fn run_args(args: &[&str]) -> Result<(RunStatus, String), CliError> {
    let options = parse_args(args.iter().map(|arg| arg.to_string()).collect())?
        .expect("options");
    let mut out = Vec::new();
    let status = run(&options, &AuditSettings::default(), &mut out)?;
    Ok((status, String::from_utf8(out).expect("utf8 output")))
}

fn snapshot(data: &Path, known: &Path) {
    let (_, listing) = run_args(&["-r", data.to_str().unwrap()]).unwrap();
    fs::write(known, listing).unwrap();
}

#[test]
fn moved_file_fails_the_audit() {
    let data = tempdir().unwrap();
    fs::create_dir(data.path().join("docs")).unwrap();
    fs::write(data.path().join("docs/report.txt"), "quarterly").unwrap();
    fs::write(data.path().join("keep.txt"), "keep").unwrap();
    let work = tempdir().unwrap();
    let known = work.path().join("known.hashdeep");
    snapshot(data.path(), &known);

    fs::rename(
        data.path().join("docs/report.txt"),
        data.path().join("report.txt"),
    )
    .unwrap();

    let (status, text) = run_args(&[
        "-a",
        "-vvv",
        "-r",
        "-k",
        known.to_str().unwrap(),
        data.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(status, RunStatus::AuditFailed);
    assert!(text.contains("keep.txt: Ok"));
    assert!(text.contains("report.txt: Moved from "));
    assert!(text.contains("            Files moved: 1"));
    assert!(text.contains("report.txt: Known file not used"));
    assert!(text.contains("  Known files not found: 1"));
}

#[test]
fn plain_sum_files_are_accepted_as_known_sets() {
    let data = tempdir().unwrap();
    let file = data.path().join("empty.txt");
    fs::write(&file, "").unwrap();
    let work = tempdir().unwrap();
    let known = work.path().join("MD5SUMS");
    fs::write(
        &known,
        format!("d41d8cd98f00b204e9800998ecf8427e  {}\n", file.display()),
    )
    .unwrap();

    let (status, text) = run_args(&[
        "-a",
        "-c",
        "md5",
        "-k",
        known.to_str().unwrap(),
        file.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(status, RunStatus::Success);
    assert_eq!(text, "hashaudit: Audit passed\n");
}

#[test]
fn unreadable_known_sets_leave_nothing_to_match() {
    let work = tempdir().unwrap();
    let missing = work.path().join("missing.txt");
    let err = run_args(&["-m", "-s", "-k", missing.to_str().unwrap(), "input"]).unwrap_err();
    assert!(matches!(err, CliError::NoKnownEntries));
    assert_eq!(err.to_string(), "Unable to load any matching files");
}

#[test]
fn conflicting_modes_are_rejected_before_running() {
    let err = run_args(&["-m", "-x", "-k", "known.txt", "input"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Regular and negative matching are mutually exclusive"
    );
}
