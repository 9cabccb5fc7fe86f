//! Nested archive expansion.
//!
//! Two kinds of nested archives are expanded into the staging tree:
//!
//! - [`classifier`] — one zip per classifier of a multi-runtime dependency,
//!   each extracted into its own named subdirectory
//! - [`bundle`] — a gzip-compressed tarball embedded inside a plugin jar
//!
//! Both kinds, plus the optional backend-CLI tarball, share the extraction
//! helpers in this module. Every entry path is checked against the output
//! directory before anything is written: an entry resolving outside it is a
//! fatal error, never extracted.

pub mod bundle;
pub mod classifier;

use std::fs::File;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;
use zip::ZipArchive;

use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Joins an archive entry path onto `base`, rejecting entries that would
/// escape it (absolute paths, drive prefixes, `..` components).
///
/// # Errors
///
/// Returns [`AssemblyError::UnsafeArchivePath`] for an escaping entry.
pub fn safe_join(base: &Path, entry: &Path) -> AssemblyResult<PathBuf> {
    let mut joined = base.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AssemblyError::UnsafeArchivePath {
                    entry: entry.to_string_lossy().into_owned(),
                });
            }
        }
    }
    Ok(joined)
}

/// Decompresses a gzip-compressed tar archive into `output_dir`, preserving
/// directory structure.
///
/// Directory entries are created (with ancestors); file entries are
/// stream-copied to their relative path under `output_dir`, creating
/// ancestors as needed.
///
/// # Errors
///
/// Returns an error for unreadable input, an unparsable tar stream, an
/// unsafe entry path, or any write failure. The run is not retried.
pub fn expand_tar_gz(tgz_path: &Path, output_dir: &Path) -> AssemblyResult<()> {
    let input = File::open(tgz_path).map_err(|e| AssemblyError::read(tgz_path, e))?;
    let decoder = GzDecoder::new(input);
    let mut archive = tar::Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| AssemblyError::archive(tgz_path, e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| AssemblyError::archive(tgz_path, e.to_string()))?;
        let entry_path = entry
            .path()
            .map_err(|e| AssemblyError::archive(tgz_path, e.to_string()))?
            .into_owned();
        let target = safe_join(output_dir, &entry_path)?;

        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| AssemblyError::write(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| AssemblyError::write(parent, e))?;
            }
            let mut output =
                File::create(&target).map_err(|e| AssemblyError::write(&target, e))?;
            std::io::copy(&mut entry, &mut output)
                .map_err(|e| AssemblyError::write(&target, e))?;
        }
        debug!(entry = %entry_path.display(), "expanded tar entry");
    }

    Ok(())
}

/// Fully extracts a zip archive into `output_dir`, preserving directory
/// structure.
///
/// # Errors
///
/// Returns an error for an unreadable or unparsable archive, an unsafe
/// entry name, or any write failure.
pub fn extract_zip(archive_path: &Path, output_dir: &Path) -> AssemblyResult<()> {
    let input = File::open(archive_path).map_err(|e| AssemblyError::read(archive_path, e))?;
    let mut archive = ZipArchive::new(input)
        .map_err(|e| AssemblyError::archive(archive_path, e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| AssemblyError::archive(archive_path, e.to_string()))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(AssemblyError::UnsafeArchivePath {
                entry: entry.name().to_string(),
            });
        };
        let target = output_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| AssemblyError::write(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| AssemblyError::write(parent, e))?;
            }
            let mut output =
                File::create(&target).map_err(|e| AssemblyError::write(&target, e))?;
            std::io::copy(&mut entry, &mut output)
                .map_err(|e| AssemblyError::write(&target, e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_join_plain_relative_path() {
        let joined = safe_join(Path::new("/out"), Path::new("lib/server.js")).unwrap();
        assert_eq!(joined, Path::new("/out/lib/server.js"));
    }

    #[test]
    fn safe_join_ignores_current_dir_components() {
        let joined = safe_join(Path::new("/out"), Path::new("./lib/./server.js")).unwrap();
        assert_eq!(joined, Path::new("/out/lib/server.js"));
    }

    #[test]
    fn safe_join_rejects_parent_components() {
        let result = safe_join(Path::new("/out"), Path::new("../escape"));
        assert!(matches!(result, Err(AssemblyError::UnsafeArchivePath { .. })));
    }

    #[test]
    fn safe_join_rejects_nested_parent_components() {
        let result = safe_join(Path::new("/out"), Path::new("lib/../../escape"));
        assert!(matches!(result, Err(AssemblyError::UnsafeArchivePath { .. })));
    }

    #[test]
    fn safe_join_rejects_absolute_paths() {
        let result = safe_join(Path::new("/out"), Path::new("/etc/passwd"));
        assert!(matches!(result, Err(AssemblyError::UnsafeArchivePath { .. })));
    }
}
