//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::assembly::ArtifactCoordinate;
use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Root of the local dependency cache to resolve artifacts from.
    pub cache_dir: PathBuf,

    /// Staging root where the distribution tree is assembled.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Final resource output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Name of the distribution subdirectory under the staging root.
    ///
    /// This is the single leading path segment the resource collector strips.
    #[serde(default = "default_distribution_name")]
    pub distribution_name: String,

    /// Analyzer plugin coordinates copied flat into `plugins/`.
    #[serde(default)]
    pub plugins: Vec<ArtifactCoordinate>,

    /// Rename rules applied to `plugins/`, in declaration order.
    ///
    /// Keys are filename regular expressions, values the canonical filename
    /// a match is renamed to.
    #[serde(default = "default_rename_rules")]
    pub rename_rules: IndexMap<String, String>,

    /// Classified runtime-support coordinates expanded under `omnisharp/`.
    #[serde(default)]
    pub omnisharp: Vec<ArtifactCoordinate>,

    /// Embedded JS-analysis bundle extraction settings.
    #[serde(default)]
    pub eslint_bridge: EslintBridgeConfig,

    /// Optional backend-CLI bundle expanded under `sloop/`.
    #[serde(default)]
    pub sloop: Option<ArtifactCoordinate>,

    /// Credentials for private artifacts. Absence puts the assembler in
    /// degraded mode: credential-gated coordinates are skipped.
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.distribution_name.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "distribution_name must not be empty".to_string(),
            });
        }
        if self.distribution_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "distribution_name '{}' must be a single path segment",
                    self.distribution_name
                ),
            });
        }

        for (pattern, canonical) in &self.rename_rules {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(ConfigError::ValidationError {
                    message: format!("invalid rename rule pattern '{pattern}': {e}"),
                });
            }
            if canonical.is_empty() || canonical.contains(['/', '\\']) {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "rename rule target '{canonical}' must be a plain filename"
                    ),
                });
            }
        }

        if let Err(e) = regex::Regex::new(&self.eslint_bridge.bundle_pattern) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "invalid eslint_bridge bundle pattern '{}': {e}",
                    self.eslint_bridge.bundle_pattern
                ),
            });
        }
        if self.eslint_bridge.jar_prefix.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "eslint_bridge jar_prefix must not be empty".to_string(),
            });
        }

        for coordinate in &self.omnisharp {
            if coordinate.classifier.is_none() {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "omnisharp coordinate '{coordinate}' must declare a classifier"
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Settings for extracting the embedded JS-analysis runtime bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EslintBridgeConfig {
    /// Prefix identifying the plugin jar that carries the bundle.
    #[serde(default = "default_jar_prefix")]
    pub jar_prefix: String,

    /// Regular expression matching the embedded `.tgz` entry name.
    #[serde(default = "default_bundle_pattern")]
    pub bundle_pattern: String,

    /// Name of the output subdirectory under `plugins/`.
    #[serde(default = "default_bundle_output_dir")]
    pub output_dir_name: String,
}

impl Default for EslintBridgeConfig {
    fn default() -> Self {
        Self {
            jar_prefix: default_jar_prefix(),
            bundle_pattern: default_bundle_pattern(),
            output_dir_name: default_bundle_output_dir(),
        }
    }
}

fn default_jar_prefix() -> String {
    "sonar-javascript-plugin-".to_string()
}

fn default_bundle_pattern() -> String {
    r"sonarjs-.*\.tgz".to_string()
}

fn default_bundle_output_dir() -> String {
    "eslint-bridge".to_string()
}

/// Credentials for the private artifact repository.
///
/// The `Debug` implementation redacts the password so credentials can never
/// leak through logging or error formatting.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// Repository username.
    pub username: String,

    /// Repository password or token.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/generated-resources/plugins")
}

fn default_distribution_name() -> String {
    "sonar-mcp-server".to_string()
}

fn default_rename_rules() -> IndexMap<String, String> {
    let mut rules = IndexMap::new();
    // Order matters: the enterprise pattern must be tried before the plain
    // csharp pattern, which would otherwise also match enterprise jars.
    rules.insert(
        r"sonar-csharp-enterprise-plugin-.*\.jar".to_string(),
        "sonar-csharp-enterprise-plugin.jar".to_string(),
    );
    rules.insert(
        r"sonar-csharp-plugin-.*\.jar".to_string(),
        "sonar-csharp-plugin.jar".to_string(),
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r#"{ "cache_dir": "/var/cache/artifacts" }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.staging_dir, PathBuf::from("build"));
        assert_eq!(config.distribution_name, "sonar-mcp-server");
        assert_eq!(config.rename_rules.len(), 2);
        assert!(config.credentials.is_none());
        assert!(config.sloop.is_none());
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "cache_dir": "/var/cache/artifacts",
            "staging_dir": "out/staging",
            "output_dir": "out/resources",
            "distribution_name": "my-server",
            "plugins": [
                {
                    "group": "org.example",
                    "name": "sonar-java-plugin",
                    "version": "7.0.1"
                }
            ],
            "rename_rules": {
                "sonar-java-plugin-.*\\.jar": "sonar-java-plugin.jar"
            },
            "omnisharp": [
                {
                    "group": "org.example",
                    "name": "omnisharp-roslyn",
                    "version": "1.39.0",
                    "classifier": "mono",
                    "extension": "zip",
                    "requires_credentials": true
                }
            ],
            "eslint_bridge": {
                "jar_prefix": "sonar-javascript-plugin-",
                "bundle_pattern": "sonarjs-.*\\.tgz",
                "output_dir_name": "eslint-bridge"
            },
            "credentials": {
                "username": "ci",
                "password": "secret"
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.distribution_name, "my-server");
        assert_eq!(config.plugins.len(), 1);
        assert_eq!(config.omnisharp.len(), 1);
        assert_eq!(
            config.omnisharp[0].classifier.as_deref(),
            Some("mono")
        );
        assert!(config.omnisharp[0].requires_credentials);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn default_rename_rules_order() {
        let rules = default_rename_rules();
        let first = rules.keys().next().unwrap();
        assert!(first.contains("enterprise"));
    }

    #[test]
    fn eslint_bridge_defaults() {
        let config = EslintBridgeConfig::default();
        assert_eq!(config.jar_prefix, "sonar-javascript-plugin-");
        assert_eq!(config.output_dir_name, "eslint-bridge");
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_invalid_rename_pattern() {
        let json = r#"{
            "cache_dir": "/tmp/cache",
            "rename_rules": { "broken[": "fixed.jar" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_nested_distribution_name() {
        let json = r#"{
            "cache_dir": "/tmp/cache",
            "distribution_name": "a/b"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_omnisharp_without_classifier() {
        let json = r#"{
            "cache_dir": "/tmp/cache",
            "omnisharp": [
                { "group": "g", "name": "n", "version": "1" }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "cache_dir": "/tmp/cache",
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "ci".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("ci"));
        assert!(!rendered.contains("hunter2"));
    }
}
