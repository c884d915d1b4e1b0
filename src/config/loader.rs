//! Locating and parsing the settings file.

use std::path::{Path, PathBuf};

use super::AppConfig;
use crate::error::{ProvisionError, Result};

/// Settings file used when neither `--config` nor the env override is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "AZ_PROVISION_CONFIG";

/// Default settings path, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Read and parse the settings document at `path`.
///
/// # Arguments
/// * `path` - JSON settings file
///
/// # Returns
/// * `Ok(AppConfig)` - The parsed settings
/// * `Err(ConfigNotFound)` - If the path does not exist
/// * `Err(ConfigParseError)` - If the content is not a well-formed settings document
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        log::error!("Config file not found: {}", path.display());
        return Err(ProvisionError::ConfigNotFound(path.to_path_buf()));
    }
    log::info!("Reading config file: {}", path.display());

    let json = std::fs::read_to_string(path).map_err(|e| ProvisionError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let config: AppConfig = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("Error parsing config at path={}: {}", e.path(), e);
        ProvisionError::ConfigParseError {
            path: path.display().to_string(),
            message: format!("path={} error={}", e.path(), e.inner()),
        }
    })?;

    config
        .network
        .validate()
        .map_err(|message| ProvisionError::ConfigParseError {
            path: path.display().to_string(),
            message,
        })?;

    log::debug!("Config loaded: interactive={}", config.interactive);
    Ok(config)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}
