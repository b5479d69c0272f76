//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading and size formatting used by
//! more than one subcommand.

use crate::cli::args::JoinArgs;
use crate::config::JoinConfig;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over `level` when it is set. Quiet runs drop
/// the uptime timer and use the compact format.
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sld_ocdid={}", level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
pub fn load_configuration(args: &JoinArgs) -> Result<JoinConfig> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, using defaults"),
    }

    let config = JoinConfig::load_layered(args.config_file.as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply_overrides(config);

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
