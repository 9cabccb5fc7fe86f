//! plugin-assembler: build-time staging of analyzer plugins and runtime bundles
//!
//! Resolves analyzer plugin archives from a local dependency cache, stages
//! them into the distribution layout and collects the result into the
//! packaged resource output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use plugin_assembler::assembly::Assembler;
use plugin_assembler::config;

/// Build-time assembler for analyzer plugins and embedded runtime bundles.
///
/// Resolves declared plugin artifacts from the local dependency cache,
/// stages them into the distribution layout (flat jars, normalised names,
/// expanded nested archives) and collects the staged tree into the packaged
/// resource output.
#[derive(Parser, Debug)]
#[command(name = "plugin-assembler")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Override the local dependency cache directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Override the staging root directory
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<PathBuf>,

    /// Override the final resource output directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Stop after staging, do not collect into the resource output
    #[arg(long)]
    skip_collect: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the plugin-assembler CLI.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let mut cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nExpected config at: {}", default_path.display());
                    eprintln!("Create one based on config/example-config.json");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // CLI overrides take precedence over the config file
    if let Some(cache_dir) = args.cache_dir {
        cfg.cache_dir = cache_dir;
    }
    if let Some(staging_dir) = args.staging_dir {
        cfg.staging_dir = staging_dir;
    }
    if let Some(output_dir) = args.output_dir {
        cfg.output_dir = output_dir;
    }

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        distribution = %cfg.distribution_name,
        "Starting plugin assembly"
    );

    let assembler = Assembler::new(cfg);
    match assembler.run(!args.skip_collect) {
        Ok(report) => {
            info!(
                plugins = report.staged_plugins.len(),
                bundles = report.expanded_bundles.len(),
                skipped = report.skipped.len(),
                "Assembly finished"
            );
            if !report.skipped.is_empty() {
                for coordinate in &report.skipped {
                    info!(%coordinate, "skipped (credentials not configured)");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Assembly failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn verbosity_flags_override_config_level() {
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(1, false, "error"), Level::INFO);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(3, false, "warn"), Level::TRACE);
        assert_eq!(get_log_level(2, true, "trace"), Level::ERROR);
    }
}
