//! Artifact coordinates and resolved archives.
//!
//! A coordinate identifies one binary dependency the way a Maven-style cache
//! stores it: group, name, version, optional classifier, file extension. The
//! resolver turns coordinates into [`ResolvedArchive`]s pointing at concrete
//! files on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Identifies one binary dependency to resolve from the local cache.
///
/// Immutable once declared in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactCoordinate {
    /// Group identifier, dot-separated (e.g. `org.sonarsource.javascript`).
    pub group: String,

    /// Artifact name (e.g. `sonar-javascript-plugin`).
    pub name: String,

    /// Version string.
    pub version: String,

    /// Optional classifier distinguishing variants of one logical artifact
    /// (e.g. `mono`, `net472`, `net6`).
    #[serde(default)]
    pub classifier: Option<String>,

    /// Archive file extension. Defaults to `jar`.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Whether this artifact lives in the private repository and is only
    /// resolvable when credentials are configured.
    #[serde(default)]
    pub requires_credentials: bool,

    /// Optional SHA-256 checksum (lowercase hex) to verify after resolution.
    #[serde(default)]
    pub sha256: Option<String>,
}

fn default_extension() -> String {
    "jar".to_string()
}

impl ArtifactCoordinate {
    /// The archive filename for this coordinate:
    /// `<name>-<version>[-<classifier>].<extension>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.name, self.version, classifier, self.extension
            ),
            None => format!("{}-{}.{}", self.name, self.version, self.extension),
        }
    }

    /// The path this coordinate occupies under a Maven-layout cache root:
    /// `<group-as-path>/<name>/<version>/<file_name>`.
    #[must_use]
    pub fn cache_path(&self, cache_root: &Path) -> PathBuf {
        let mut path = cache_root.to_path_buf();
        for segment in self.group.split('.') {
            path.push(segment);
        }
        path.push(&self.name);
        path.push(&self.version);
        path.push(self.file_name());
        path
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        if self.extension != "jar" {
            write!(f, "@{}", self.extension)?;
        }
        Ok(())
    }
}

/// A coordinate resolved to a concrete archive file on local disk.
#[derive(Debug, Clone)]
pub struct ResolvedArchive {
    /// The originating coordinate.
    pub coordinate: ArtifactCoordinate,

    /// Absolute or cache-relative path of the archive file.
    pub path: PathBuf,
}

impl ResolvedArchive {
    /// The classifier this archive was published under, if any.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.coordinate.classifier.as_deref()
    }

    /// The archive's filename.
    ///
    /// Coordinates always produce a non-empty `<name>-<version>.<ext>` final
    /// component, so this cannot fail for resolver-produced archives.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(classifier: Option<&str>, extension: &str) -> ArtifactCoordinate {
        ArtifactCoordinate {
            group: "org.sonarsource.javascript".to_string(),
            name: "sonar-javascript-plugin".to_string(),
            version: "10.14.0".to_string(),
            classifier: classifier.map(ToString::to_string),
            extension: extension.to_string(),
            requires_credentials: false,
            sha256: None,
        }
    }

    #[test]
    fn file_name_without_classifier() {
        assert_eq!(
            coordinate(None, "jar").file_name(),
            "sonar-javascript-plugin-10.14.0.jar"
        );
    }

    #[test]
    fn file_name_with_classifier() {
        assert_eq!(
            coordinate(Some("mono"), "zip").file_name(),
            "sonar-javascript-plugin-10.14.0-mono.zip"
        );
    }

    #[test]
    fn cache_path_uses_maven_layout() {
        let path = coordinate(None, "jar").cache_path(Path::new("/cache"));
        assert_eq!(
            path,
            Path::new(
                "/cache/org/sonarsource/javascript/sonar-javascript-plugin/10.14.0/sonar-javascript-plugin-10.14.0.jar"
            )
        );
    }

    #[test]
    fn display_includes_classifier_and_extension() {
        let coordinate = coordinate(Some("net6"), "zip");
        assert_eq!(
            coordinate.to_string(),
            "org.sonarsource.javascript:sonar-javascript-plugin:10.14.0:net6@zip"
        );
    }

    #[test]
    fn display_omits_default_extension() {
        let coordinate = coordinate(None, "jar");
        assert_eq!(
            coordinate.to_string(),
            "org.sonarsource.javascript:sonar-javascript-plugin:10.14.0"
        );
    }

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{ "group": "g", "name": "n", "version": "1.0" }"#;
        let coordinate: ArtifactCoordinate = serde_json::from_str(json).unwrap();
        assert_eq!(coordinate.extension, "jar");
        assert!(coordinate.classifier.is_none());
        assert!(!coordinate.requires_credentials);
        assert!(coordinate.sha256.is_none());
    }
}
