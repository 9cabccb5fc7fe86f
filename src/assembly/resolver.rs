//! Artifact resolution against the local dependency cache.
//!
//! Resolution is purely local: each coordinate maps to one expected file in a
//! Maven-layout cache, and a missing required file is a fatal configuration
//! error. Coordinates marked `requires_credentials` are skipped entirely when
//! no credentials are configured — the documented degraded mode, not an
//! error.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::assembly::coordinate::{ArtifactCoordinate, ResolvedArchive};
use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::config::Credentials;

/// Outcome of resolving one list of coordinates.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Coordinates resolved to concrete archive files.
    pub archives: Vec<ResolvedArchive>,

    /// Coordinates skipped because they require absent credentials.
    pub skipped: Vec<ArtifactCoordinate>,
}

/// Resolves a set of declared coordinates against the local cache.
///
/// Every coordinate either resolves to an existing archive file, is skipped
/// (credential-gated, degraded mode), or aborts the run. There is no
/// best-effort partial resolution.
///
/// # Errors
///
/// Returns [`AssemblyError::ArtifactNotResolved`] for a required coordinate
/// with no cached file, or [`AssemblyError::ChecksumMismatch`] when a
/// declared checksum does not match the cached archive.
pub fn resolve(
    coordinates: &[ArtifactCoordinate],
    cache_root: &Path,
    credentials: Option<&Credentials>,
) -> AssemblyResult<Resolution> {
    let mut resolution = Resolution::default();

    for coordinate in coordinates {
        if coordinate.requires_credentials && credentials.is_none() {
            info!(%coordinate, "skipping credential-gated artifact (no credentials configured)");
            resolution.skipped.push(coordinate.clone());
            continue;
        }

        let path = coordinate.cache_path(cache_root);
        if !path.is_file() {
            return Err(AssemblyError::artifact_not_resolved(
                coordinate.to_string(),
                path,
            ));
        }

        if let Some(expected) = &coordinate.sha256 {
            verify_checksum(&path, expected)?;
        }

        debug!(%coordinate, path = %path.display(), "resolved artifact");
        resolution.archives.push(ResolvedArchive {
            coordinate: coordinate.clone(),
            path,
        });
    }

    Ok(resolution)
}

/// Verifies the SHA-256 checksum of a resolved archive.
///
/// # Errors
///
/// Returns a read error if the file cannot be read, or a checksum mismatch
/// if the computed digest differs from `expected`.
pub fn verify_checksum(path: &Path, expected: &str) -> AssemblyResult<()> {
    debug!(path = %path.display(), "verifying checksum");

    let contents = std::fs::read(path).map_err(|e| AssemblyError::read(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let actual = format!("{:x}", hasher.finalize());

    if !actual.eq_ignore_ascii_case(expected) {
        return Err(AssemblyError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(())
}
