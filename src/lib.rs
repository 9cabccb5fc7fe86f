//! plugin-assembler: build-time staging of analyzer plugins and runtime bundles
//!
//! This library assembles the plugin layout a packaged server distribution
//! consumes at runtime: analyzer jars under `plugins/`, per-runtime support
//! under `omnisharp/<classifier>/`, the embedded JS-analysis runtime under
//! `plugins/eslint-bridge/` and the optional backend CLI under `sloop/`.
//!
//! # Architecture
//!
//! The pipeline is a fixed sequence of filesystem-transforming stages over a
//! staging directory:
//!
//! - **Resolution**: declared coordinates → archive files in the local cache
//! - **Staging**: flat copy, filename normalisation, nested-archive expansion
//! - **Collection**: the staged tree, minus its leading segment, becomes the
//!   packaged resource output
//!
//! Resolution is purely local; fetching artifacts into the cache, signing and
//! publishing are external concerns.
//!
//! # Modules
//!
//! - [`assembly`] — the staging pipeline and its stages
//! - [`config`] — configuration loading and validation
//! - [`error`] — configuration error types

pub mod assembly;
pub mod config;
pub mod error;
