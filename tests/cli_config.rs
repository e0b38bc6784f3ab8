mod support;

use std::fs;

use hashaudit::app_dirs::{APP_DIR_NAME, logs_dir};
use hashaudit::cli::{RunStatus, parse_args, run};
use hashaudit::config::{self, AuditSettings, CONFIG_FILE_NAME};
use support::config_env::ConfigHomeGuard;
use tempfile::tempdir;

#[test]
fn settings_file_drives_the_next_run() {
    let home = tempdir().unwrap();
    let _guard = ConfigHomeGuard::set(home.path().to_path_buf());

    let app_dir = home.path().join(APP_DIR_NAME);
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(
        app_dir.join(CONFIG_FILE_NAME),
        "algorithms = [\"blake3\"]\nrecursive = true\n",
    )
    .unwrap();
    let loaded = config::load_or_default().unwrap();
    assert_eq!(
        loaded,
        AuditSettings {
            algorithms: vec!["blake3".into()],
            recursive: true,
            ..AuditSettings::default()
        }
    );

    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "alpha").unwrap();
    let options = parse_args(vec![data.path().to_string_lossy().into_owned()])
        .unwrap()
        .unwrap();
    let mut out = Vec::new();
    let status = run(&options, &loaded, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(status, RunStatus::Success);
    assert!(text.contains("%%%% size,blake3,filename"));
    assert!(text.lines().any(|line| line.ends_with("a.txt")));
}

#[test]
fn command_line_algorithms_override_settings() {
    let home = tempdir().unwrap();
    let _guard = ConfigHomeGuard::set(home.path().to_path_buf());

    let data = tempdir().unwrap();
    let file = data.path().join("a.txt");
    fs::write(&file, "alpha").unwrap();
    let options = parse_args(vec![
        "-c".into(),
        "sha1".into(),
        file.to_string_lossy().into_owned(),
    ])
    .unwrap()
    .unwrap();
    let mut out = Vec::new();
    run(&options, &config::load_or_default().unwrap(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("%%%% size,sha1,filename"));
}

#[test]
fn logs_live_under_the_config_home() {
    let home = tempdir().unwrap();
    let _guard = ConfigHomeGuard::set(home.path().to_path_buf());
    let dir = logs_dir().unwrap();
    assert_eq!(dir, home.path().join(APP_DIR_NAME).join("logs"));
}
