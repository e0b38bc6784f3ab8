use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;
use tracing::debug;

use crate::app_dirs;

use super::errors::ConfigError;
use super::{AuditSettings, CONFIG_FILE_NAME, map_app_dir_error};

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<AuditSettings, ConfigError> {
    let path = config_path()?;
    load_settings_from(&path)
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<AuditSettings, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No settings file; using defaults");
        return Ok(AuditSettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<AuditSettings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AuditSettings::normalized)
}
