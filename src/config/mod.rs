//! Persisted defaults for audit runs.
//!
//! Settings live in `config.toml` inside the app directory and are edited by
//! hand. Command-line flags override whatever is loaded here.

mod errors;
mod load;

pub use errors::ConfigError;
pub use load::{config_path, load_or_default, load_settings_from};

use serde::Deserialize;
use tracing::warn;

use crate::algorithm::HashAlgorithm;
use crate::app_dirs;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Algorithms used when the settings name none that are usable.
pub const DEFAULT_ALGORITHMS: [HashAlgorithm; 2] = [HashAlgorithm::Md5, HashAlgorithm::Sha256];

/// Defaults applied to every run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    pub algorithms: Vec<String>,
    pub recursive: bool,
    pub relative_paths: bool,
    /// Treat a size disagreement as a mismatch even when digests agree.
    pub size_discriminator: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            algorithms: DEFAULT_ALGORITHMS
                .iter()
                .map(|algorithm| algorithm.name().to_string())
                .collect(),
            recursive: false,
            relative_paths: false,
            size_discriminator: true,
        }
    }
}

impl AuditSettings {
    /// Drop unknown and repeated algorithm names, falling back to the
    /// defaults when nothing usable remains.
    pub fn normalized(mut self) -> Self {
        let algorithms = self.algorithm_list();
        self.algorithms = algorithms
            .iter()
            .map(|algorithm| algorithm.name().to_string())
            .collect();
        self
    }

    /// Algorithms named by the settings, in order, without duplicates.
    pub fn algorithm_list(&self) -> Vec<HashAlgorithm> {
        let mut list = Vec::new();
        for name in &self.algorithms {
            match name.parse::<HashAlgorithm>() {
                Ok(algorithm) if !list.contains(&algorithm) => list.push(algorithm),
                Ok(_) => {}
                Err(err) => warn!(algorithm = %name, error = %err, "Ignoring configured algorithm"),
            }
        }
        if list.is_empty() {
            list.extend(DEFAULT_ALGORITHMS);
        }
        list
    }
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests;
