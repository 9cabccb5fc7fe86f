//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified on the command line
//! 2. Default location:
//!    - **Linux/macOS:** `~/.plugin-assembler/config.json`
//!    - **Windows:** `%USERPROFILE%\.plugin-assembler\config.json`
//!
//! # Credentials
//!
//! Private-repository credentials may be declared in the config file or, when
//! the file has no `credentials` block, via the `ASSEMBLER_REPO_USERNAME` and
//! `ASSEMBLER_REPO_PASSWORD` environment variables. This is the only place in
//! the program that consults the environment; the pipeline itself receives an
//! explicit, already-resolved [`Credentials`] value or none at all.

mod settings;

pub use settings::{Config, Credentials, EslintBridgeConfig, LoggingConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable consulted for the repository username.
pub const ENV_REPO_USERNAME: &str = "ASSEMBLER_REPO_USERNAME";

/// Environment variable consulted for the repository password.
pub const ENV_REPO_PASSWORD: &str = "ASSEMBLER_REPO_PASSWORD";

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.plugin-assembler/`
/// - **Windows:** `%USERPROFILE%\.plugin-assembler\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".plugin-assembler"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// If `path` is `None`, uses the platform-specific default location. When the
/// file declares no credentials, the environment fallback is applied before
/// the configuration is returned.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - Required fields are missing or invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path().ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from("<default config path>"),
        })?,
    };

    if !config_path.exists() {
        return Err(ConfigError::NotFound { path: config_path });
    }

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let mut config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    if config.credentials.is_none() {
        config.credentials = credentials_from_env();
    }

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Reads credentials from the environment, if both variables are set and
/// non-empty. A half-set pair is treated as absent.
fn credentials_from_env() -> Option<Credentials> {
    let username = std::env::var(ENV_REPO_USERNAME).ok().filter(|v| !v.is_empty())?;
    let password = std::env::var(ENV_REPO_PASSWORD).ok().filter(|v| !v.is_empty())?;
    Some(Credentials { username, password })
}
