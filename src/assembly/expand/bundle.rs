//! Jar-embedded tarball expansion.
//!
//! The JS-analysis plugin jar carries its runtime as a gzip-compressed
//! tarball entry (`sonarjs-<version>.tgz`). This stage locates the jar in the
//! already-staged plugins directory, pulls the tarball entry out verbatim,
//! expands it under `plugins/<output-dir>/`, and deletes the intermediate
//! `.tgz` so only the expanded tree remains.

use std::fs::File;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::assembly::expand::{expand_tar_gz, safe_join};
use crate::assembly::scan::find_matching;
use crate::config::EslintBridgeConfig;

/// Expands the runtime bundle embedded in the matching plugin jar.
///
/// Returns the path of the populated output directory.
///
/// More than one jar matching the prefix is tolerated with a warning; the
/// lexicographically first is used so the choice does not depend on
/// filesystem enumeration order.
///
/// # Errors
///
/// Returns [`AssemblyError::PluginNotFound`] when no jar matches the prefix,
/// [`AssemblyError::BundleEntryNotFound`] when the jar has no matching
/// tarball entry, and I/O or archive errors for any failure in between. All
/// are fatal; the assembly is re-run wholesale on failure.
pub fn expand_embedded_bundle(
    plugins_dir: &Path,
    settings: &EslintBridgeConfig,
) -> AssemblyResult<PathBuf> {
    let jar_path = locate_plugin_jar(plugins_dir, &settings.jar_prefix)?;

    let entry_pattern = Regex::new(&format!("^(?:{})$", settings.bundle_pattern)).map_err(|e| {
        AssemblyError::InvalidPattern {
            pattern: settings.bundle_pattern.clone(),
            message: e.to_string(),
        }
    })?;

    let input = File::open(&jar_path).map_err(|e| AssemblyError::read(&jar_path, e))?;
    let mut archive =
        ZipArchive::new(input).map_err(|e| AssemblyError::archive(&jar_path, e.to_string()))?;

    let entry_name = archive
        .file_names()
        .filter(|name| entry_pattern.is_match(name))
        .min()
        .map(ToString::to_string)
        .ok_or_else(|| {
            AssemblyError::bundle_entry_not_found(&settings.bundle_pattern, &jar_path)
        })?;

    let output_dir = plugins_dir.join(&settings.output_dir_name);
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| AssemblyError::write(&output_dir, e))?;
    }

    let tgz_path = safe_join(&output_dir, Path::new(&entry_name))?;
    {
        let mut entry = archive
            .by_name(&entry_name)
            .map_err(|e| AssemblyError::archive(&jar_path, e.to_string()))?;
        let mut output =
            File::create(&tgz_path).map_err(|e| AssemblyError::write(&tgz_path, e))?;
        std::io::copy(&mut entry, &mut output)
            .map_err(|e| AssemblyError::write(&tgz_path, e))?;
    }

    expand_tar_gz(&tgz_path, &output_dir)?;

    std::fs::remove_file(&tgz_path).map_err(|e| AssemblyError::write(&tgz_path, e))?;

    info!(
        jar = %jar_path.display(),
        bundle = %entry_name,
        output = %output_dir.display(),
        "expanded embedded runtime bundle"
    );

    Ok(output_dir)
}

/// Finds the plugin jar carrying the bundle.
///
/// Exactly one jar is expected; extra matches are logged and the first in
/// sorted order wins.
fn locate_plugin_jar(plugins_dir: &Path, jar_prefix: &str) -> AssemblyResult<PathBuf> {
    let matches = find_matching(plugins_dir, |name| {
        name.starts_with(jar_prefix) && name.ends_with(".jar")
    })?;

    if matches.len() > 1 {
        warn!(
            prefix = jar_prefix,
            matches = ?matches,
            "multiple plugin jars match the bundle prefix, using the first"
        );
    }

    matches
        .into_iter()
        .next()
        .ok_or_else(|| AssemblyError::plugin_not_found(format!("{jar_prefix}*.jar"), plugins_dir))
}
