use super::*;
use crate::app_dirs::{APP_DIR_NAME, ConfigBaseGuard};
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = load_settings_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(settings, AuditSettings::default());
    assert_eq!(settings.algorithm_list(), DEFAULT_ALGORITHMS.to_vec());
    assert!(settings.size_discriminator);
}

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "recursive = true\n").unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert!(settings.recursive);
    assert!(!settings.relative_paths);
    assert_eq!(settings.algorithm_list(), DEFAULT_ALGORITHMS.to_vec());
}

#[test]
fn algorithm_names_are_normalized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "algorithms = [\"SHA-1\", \"crc32\", \"sha1\", \"tiger\"]\n").unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.algorithms, vec!["sha1".to_string(), "tiger".to_string()]);
}

#[test]
fn unusable_algorithm_list_falls_back_to_defaults() {
    let settings = AuditSettings {
        algorithms: vec!["crc32".into()],
        ..AuditSettings::default()
    }
    .normalized();
    assert_eq!(settings.algorithm_list(), DEFAULT_ALGORITHMS.to_vec());
}

#[test]
fn malformed_toml_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "recursive = \"sometimes\"\n").unwrap();

    let err = load_settings_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn every_key_is_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "algorithms = [\"blake3\"]\nrecursive = true\nrelative_paths = true\nsize_discriminator = false\n",
    )
    .unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert_eq!(
        settings,
        AuditSettings {
            algorithms: vec!["blake3".into()],
            recursive: true,
            relative_paths: true,
            size_discriminator: false,
        }
    );
}

#[test]
fn config_path_uses_app_directory() {
    let base = tempdir().unwrap();
    let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
    let path = config_path().unwrap();
    assert_eq!(path, base.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME));

    std::fs::write(&path, "relative_paths = true\n").unwrap();
    let settings = load_or_default().unwrap();
    assert!(settings.relative_paths);
    assert!(!settings.recursive);
}
