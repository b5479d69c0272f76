//! Sources command implementation
//!
//! Prints the Census TIGER/Line archives that make up the combined district
//! GeoJSON, either as plain lines or as a JSON array, or downloads them into
//! the data directory with `--download`.

use super::shared::{format_size, setup_logging};
use crate::app::services::shapefile_download::ShapefileDownloader;
use crate::app::services::shapefile_sources::{ShapefileSource, plan_sources};
use crate::cli::args::{OutputFormat, SourcesArgs};
use anyhow::{Context, Result};
use colored::*;
use tracing::info;

/// Sources command runner
pub async fn run_sources(args: SourcesArgs) -> Result<()> {
    if args.download {
        setup_logging("info", false)?;
    } else {
        setup_logging("warn", true)?;
    }

    let sources = plan_sources(args.year, &args.data_dir);
    info!("Planned {} shapefile archives", sources.len());

    if !args.download {
        println!("{}", render_sources(&sources, args.format)?);
        return Ok(());
    }

    let downloader = ShapefileDownloader::new()?;
    let stats = downloader
        .download_all(&sources, !args.no_progress)
        .await
        .with_context(|| format!("Download into {} failed", args.data_dir.display()))?;

    println!("\n{}", "Download Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Archives:".bright_cyan(),
        stats.archives.to_string().bright_white().bold()
    );
    println!(
        "  {} {} in {}",
        "Written:".bright_cyan(),
        format_size(stats.bytes),
        args.data_dir.display()
    );
    println!(
        "  {} {:.2}s",
        "Elapsed:".bright_cyan(),
        stats.elapsed.as_secs_f64()
    );
    Ok(())
}

/// Render the listing in the requested format
pub fn render_sources(sources: &[ShapefileSource], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(sources
            .iter()
            .map(|s| format!("{} -> {}", s.url, s.destination.display()))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            serde_json::to_string_pretty(sources).context("Failed to serialize source listing")
        }
    }
}
