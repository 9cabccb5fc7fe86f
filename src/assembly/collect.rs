//! Resource collection into the final output layout.
//!
//! The staged distribution tree is copied into the packaged resource output
//! with the distribution-name segment stripped, so consumers see `plugins/`,
//! `omnisharp/` and `sloop/` rooted directly at the output. Only the
//! configured include subtrees are collected. This stage runs strictly after
//! every staging stage has completed.

use std::path::Path;

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Subtrees of the staged distribution that are collected into the output.
pub const INCLUDE_PATTERNS: [&str; 3] = ["plugins/**", "omnisharp/**", "sloop/**"];

/// Record of one assembly run, written as `assembly-manifest.json` at the
/// output root.
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// UTC timestamp of the run, RFC 3339.
    pub generated_at: String,

    /// Distribution name the tree was staged under.
    pub distribution: String,

    /// Flat plugin jar filenames, post-rename.
    pub plugins: Vec<String>,

    /// Expanded bundle directories, relative to the output root.
    pub bundles: Vec<String>,
}

/// Copies the staged subtrees from `distribution_dir` into `output_dir`,
/// stripping the distribution segment.
///
/// Returns the number of files copied.
///
/// # Errors
///
/// Returns a read error if the staged tree cannot be walked and a write
/// error if a copy fails.
pub fn collect_resources(distribution_dir: &Path, output_dir: &Path) -> AssemblyResult<usize> {
    let includes: Vec<Pattern> = INCLUDE_PATTERNS
        .iter()
        .map(|p| Pattern::new(p).expect("include patterns are statically valid"))
        .collect();

    let mut copied = 0;
    for entry in WalkDir::new(distribution_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| distribution_dir.to_path_buf(), Path::to_path_buf);
            AssemblyError::read(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        // Relative to the distribution dir, i.e. with the leading segment
        // already stripped.
        let relative = entry
            .path()
            .strip_prefix(distribution_dir)
            .expect("walked entries live under the walk root");

        if !includes.iter().any(|p| p.matches_path(relative)) {
            debug!(path = %relative.display(), "not included in resource output");
            continue;
        }

        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AssemblyError::write(parent, e))?;
        }
        std::fs::copy(entry.path(), &target).map_err(|e| AssemblyError::write(&target, e))?;
        copied += 1;
    }

    info!(
        copied,
        output = %output_dir.display(),
        "collected staged resources"
    );
    Ok(copied)
}

/// Writes the assembly manifest at the output root.
///
/// # Errors
///
/// Returns a write error if serialisation or the file write fails.
pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> AssemblyResult<()> {
    let path = output_dir.join("assembly-manifest.json");
    let json = serde_json::to_string_pretty(manifest).map_err(|e| {
        AssemblyError::write(&path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    std::fs::write(&path, json).map_err(|e| AssemblyError::write(&path, e))?;
    debug!(path = %path.display(), "wrote assembly manifest");
    Ok(())
}
