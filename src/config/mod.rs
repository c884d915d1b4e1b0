//! Configuration document loading and typed accessors.
//!
//! - [`loader`] - Locating and parsing the JSON settings file
//! - [`app_config`] - The settings document and its required-key lookups

mod app_config;
mod loader;

pub use app_config::{AppConfig, AzureSection, NetworkSection, ResourceGroupSection, VmSection, VmSpec};
pub use loader::{default_config_path, expand_tilde, load_config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
