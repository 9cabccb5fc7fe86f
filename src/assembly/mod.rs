//! The plugin assembly pipeline.
//!
//! Stages run strictly in sequence, each depending on the directory contents
//! produced by the one before it:
//!
//! 1. Resolve declared coordinates against the local cache
//! 2. Copy resolved plugin archives flat into `plugins/`
//! 3. Normalise versioned filenames to canonical names
//! 4. Expand classified runtime zips into `omnisharp/<classifier>/`
//! 5. Expand the tarball embedded in the JS-analysis plugin jar into
//!    `plugins/eslint-bridge/`
//! 6. Expand the optional backend-CLI tarball into `sloop/`
//! 7. Collect the staged tree into the resource output, stripping the
//!    distribution-name segment
//!
//! The pipeline is deterministic for a given set of resolved inputs, never
//! retries, and leaves a failed run's partial output for the next run's
//! overwrite semantics to repair. The caller owns exclusivity: two runs must
//! not share one staging directory.

pub mod collect;
pub mod coordinate;
pub mod copy;
pub mod error;
pub mod expand;
pub mod rename;
pub mod resolver;
pub mod scan;

pub use coordinate::{ArtifactCoordinate, ResolvedArchive};
pub use error::{AssemblyError, AssemblyResult};

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;

/// Summary of one assembly run.
#[derive(Debug)]
pub struct AssemblyReport {
    /// Flat plugin jars staged under `plugins/`, post-rename, sorted.
    pub staged_plugins: Vec<String>,

    /// Expanded bundle directories, relative to the distribution root.
    pub expanded_bundles: Vec<String>,

    /// Coordinates skipped in degraded mode.
    pub skipped: Vec<ArtifactCoordinate>,

    /// Files copied by the resource collector (zero when collection was not
    /// requested).
    pub collected_files: usize,
}

/// Runs the assembly pipeline for one validated configuration.
#[derive(Debug)]
pub struct Assembler {
    config: Config,
}

impl Assembler {
    /// Creates an assembler over a validated configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// The staged distribution directory:
    /// `<staging_dir>/<distribution_name>`.
    #[must_use]
    pub fn distribution_dir(&self) -> PathBuf {
        self.config.staging_dir.join(&self.config.distribution_name)
    }

    /// Runs every stage in order. When `collect` is false the pipeline stops
    /// after staging, leaving the resource output untouched.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the run with the stage's error; nothing is
    /// retried and no partial output is cleaned up.
    pub fn run(&self, collect: bool) -> AssemblyResult<AssemblyReport> {
        let config = &self.config;
        let credentials = config.credentials.as_ref();
        let distribution_dir = self.distribution_dir();
        let plugins_dir = distribution_dir.join("plugins");

        if credentials.is_none() {
            info!("no repository credentials configured, private-artifact stages will be skipped");
        }

        // Stage 1: resolution. All-or-nothing per coordinate list; a missing
        // required artifact aborts before anything is staged.
        let plugins = resolver::resolve(&config.plugins, &config.cache_dir, credentials)?;
        let omnisharp = resolver::resolve(&config.omnisharp, &config.cache_dir, credentials)?;
        let sloop = match &config.sloop {
            Some(coordinate) => {
                resolver::resolve(std::slice::from_ref(coordinate), &config.cache_dir, credentials)?
            }
            None => resolver::Resolution::default(),
        };

        // Stage 2: flat copy.
        copy::copy_flat(&plugins.archives, &plugins_dir)?;

        // Stage 3: filename normalisation.
        let rules = rename::rules_from_config(config)?;
        rename::normalize(&plugins_dir, &rules)?;

        // Stage 4: classified runtime expansion. A no-op in degraded mode,
        // where nothing classified resolved.
        let mut expanded_bundles = Vec::new();
        if !omnisharp.archives.is_empty() {
            let omnisharp_dir = distribution_dir.join("omnisharp");
            expand::classifier::expand_classified(&omnisharp.archives, &omnisharp_dir)?;
            for archive in &omnisharp.archives {
                if let Some(classifier) = archive.classifier() {
                    expanded_bundles.push(format!("omnisharp/{classifier}"));
                }
            }
        }

        // Stage 5: embedded tarball expansion. The carrier jar is a required
        // part of every distribution variant; its absence is fatal even in
        // degraded mode.
        expand::bundle::expand_embedded_bundle(&plugins_dir, &config.eslint_bridge)?;
        expanded_bundles.push(format!("plugins/{}", config.eslint_bridge.output_dir_name));

        // Stage 6: optional backend-CLI bundle.
        if let Some(archive) = sloop.archives.first() {
            let sloop_dir = distribution_dir.join("sloop");
            std::fs::create_dir_all(&sloop_dir)
                .map_err(|e| AssemblyError::write(&sloop_dir, e))?;
            expand::expand_tar_gz(&archive.path, &sloop_dir)?;
            expanded_bundles.push("sloop".to_string());
            info!(target = %sloop_dir.display(), "expanded backend-CLI bundle");
        }

        let staged_plugins: Vec<String> =
            scan::find_matching(&plugins_dir, |name| name.ends_with(".jar"))?
                .iter()
                .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                .collect();

        // Stage 7: resource collection, strictly last.
        let collected_files = if collect {
            let copied = collect::collect_resources(&distribution_dir, &config.output_dir)?;
            let manifest = collect::Manifest {
                generated_at: chrono::Utc::now().to_rfc3339(),
                distribution: config.distribution_name.clone(),
                plugins: staged_plugins.clone(),
                bundles: expanded_bundles.clone(),
            };
            collect::write_manifest(&config.output_dir, &manifest)?;
            copied
        } else {
            info!("resource collection skipped on request");
            0
        };

        let mut skipped = plugins.skipped;
        skipped.extend(omnisharp.skipped);
        skipped.extend(sloop.skipped);

        info!(
            plugins = staged_plugins.len(),
            bundles = expanded_bundles.len(),
            skipped = skipped.len(),
            collected_files,
            "assembly complete"
        );

        Ok(AssemblyReport {
            staged_plugins,
            expanded_bundles,
            skipped,
            collected_files,
        })
    }
}
