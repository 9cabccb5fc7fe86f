//! Error types for plugin assembly operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors that can occur while assembling the plugin distribution.
///
/// Every variant is fatal: the pipeline aborts on the first error and leaves
/// repair to the next run's overwrite semantics.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A declared artifact coordinate has no file in the local cache.
    #[error("artifact not found in cache: {coordinate} (expected at {path})")]
    ArtifactNotResolved {
        /// The unresolvable coordinate, in `group:name:version` form.
        coordinate: String,
        /// Cache path where the archive was expected.
        path: PathBuf,
    },

    /// No file in the plugins directory matched a required name pattern.
    #[error("required plugin matching '{pattern}' not found in {directory}")]
    PluginNotFound {
        /// The filename prefix or pattern that was searched for.
        pattern: String,
        /// Directory that was scanned.
        directory: PathBuf,
    },

    /// No entry inside an archive matched the expected bundle pattern.
    #[error("expected bundle matching '{pattern}' not found in {archive}")]
    BundleEntryNotFound {
        /// The entry-name pattern that was searched for.
        pattern: String,
        /// The archive that was scanned.
        archive: PathBuf,
    },

    /// More than one file matched a single rename rule.
    #[error("rename rule '{pattern}' matched multiple files: {matches:?}")]
    AmbiguousRename {
        /// The rule's filename pattern.
        pattern: String,
        /// Every matching filename, in sorted order.
        matches: Vec<String>,
    },

    /// An archive entry path would escape the extraction directory.
    #[error("archive entry has unsafe path: {entry}")]
    UnsafeArchivePath {
        /// The offending entry path as stored in the archive.
        entry: String,
    },

    /// A resolved archive did not match its declared checksum.
    #[error("checksum mismatch for {path} (expected: {expected}, got: {actual})")]
    ChecksumMismatch {
        /// The archive that failed verification.
        path: PathBuf,
        /// Declared SHA-256 checksum.
        expected: String,
        /// Computed SHA-256 checksum.
        actual: String,
    },

    /// A configured filename pattern failed to compile.
    #[error("invalid filename pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Description of the compile failure.
        message: String,
    },

    /// An archive could not be parsed as its expected format.
    #[error("failed to read archive {path}: {message}")]
    Archive {
        /// The unreadable archive.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// Failed to read a file or directory.
    #[error("failed to read: {path}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write a file or create a directory.
    #[error("failed to write: {path}")]
    Write {
        /// The path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl AssemblyError {
    /// Creates an artifact-not-resolved error.
    pub fn artifact_not_resolved(coordinate: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ArtifactNotResolved {
            coordinate: coordinate.into(),
            path: path.into(),
        }
    }

    /// Creates a plugin-not-found error.
    pub fn plugin_not_found(pattern: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self::PluginNotFound {
            pattern: pattern.into(),
            directory: directory.into(),
        }
    }

    /// Creates a bundle-entry-not-found error.
    pub fn bundle_entry_not_found(pattern: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        Self::BundleEntryNotFound {
            pattern: pattern.into(),
            archive: archive.into(),
        }
    }

    /// Creates an archive parse error.
    pub fn archive(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
