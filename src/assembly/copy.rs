//! Flat copy stage.
//!
//! Copies every resolved plugin archive, with no directory nesting, into the
//! staging tree's `plugins/` directory. Pre-existing files with the same name
//! are overwritten, which is what makes a re-run after a failed assembly
//! self-repairing.

use std::path::Path;

use tracing::{debug, info};

use crate::assembly::coordinate::ResolvedArchive;
use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Copies resolved archives verbatim into `destination`.
///
/// The destination directory is created if absent. File content is not
/// transformed.
///
/// # Errors
///
/// Returns a write error if the destination cannot be created or a copy
/// fails.
pub fn copy_flat(archives: &[ResolvedArchive], destination: &Path) -> AssemblyResult<()> {
    std::fs::create_dir_all(destination).map_err(|e| AssemblyError::write(destination, e))?;

    for archive in archives {
        let target = destination.join(archive.file_name());
        std::fs::copy(&archive.path, &target).map_err(|e| AssemblyError::write(&target, e))?;
        debug!(from = %archive.path.display(), to = %target.display(), "copied plugin");
    }

    info!(
        count = archives.len(),
        destination = %destination.display(),
        "copied plugins"
    );
    Ok(())
}
