//! Zip-of-zips expansion for classified runtime artifacts.
//!
//! One logical dependency published under several OS/runtime classifiers
//! (in practice `mono`, `net472`, `net6`) is expanded so that each classified
//! zip lands in its own subdirectory, named after the classifier, under a
//! fixed parent directory. The count is not hard-coded: however many
//! classified archives resolved get expanded.

use std::path::Path;

use tracing::info;

use crate::assembly::coordinate::ResolvedArchive;
use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::assembly::expand::extract_zip;

/// Expands each classified archive into `<parent_dir>/<classifier>/`.
///
/// Archives without a classifier are a configuration mistake; they are
/// rejected rather than expanded into an unnamed directory.
///
/// # Errors
///
/// Returns an error for a classifier-less archive, an unreadable zip, or any
/// write failure.
pub fn expand_classified(
    archives: &[ResolvedArchive],
    parent_dir: &Path,
) -> AssemblyResult<()> {
    for archive in archives {
        let Some(classifier) = archive.classifier() else {
            return Err(AssemblyError::archive(
                &archive.path,
                format!(
                    "classified artifact '{}' has no classifier",
                    archive.coordinate
                ),
            ));
        };

        let target = parent_dir.join(classifier);
        std::fs::create_dir_all(&target).map_err(|e| AssemblyError::write(&target, e))?;
        extract_zip(&archive.path, &target)?;
        info!(
            classifier,
            target = %target.display(),
            "expanded classified runtime archive"
        );
    }

    Ok(())
}
