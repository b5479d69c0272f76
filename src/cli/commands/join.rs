//! Join command implementation
//!
//! Loads configuration, runs the streaming join and prints a colored summary
//! to stdout. Diagnostics go through `tracing` on stderr.

use super::shared::{format_size, load_configuration, setup_logging};
use crate::app::models::JoinStats;
use crate::cli::args::JoinArgs;
use crate::processor::JoinProcessor;
use anyhow::{Context, Result};
use colored::*;
use tracing::debug;

/// Join command runner
pub async fn run_join(args: JoinArgs) -> Result<JoinStats> {
    setup_logging(args.get_log_level(), args.quiet)?;
    debug!("Join arguments: {:?}", args);

    let config = load_configuration(&args)?;
    let processor = JoinProcessor::new(config)?;

    let stats = processor.run().await.with_context(|| {
        format!(
            "Join failed; {} is incomplete",
            processor.config().output_path.display()
        )
    })?;

    if !args.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}

fn print_summary(stats: &JoinStats) {
    println!("\n{}", "Join Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Features written:".bright_cyan(),
        stats.features_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {} upper, {} lower ({:.1}%)",
        "Matched:".bright_cyan(),
        stats.matched_upper,
        stats.matched_lower,
        stats.match_rate()
    );
    if stats.unmatched > 0 {
        println!(
            "  {} {}",
            "Unmatched:".bright_cyan(),
            stats.unmatched.to_string().bright_yellow().bold()
        );
    }
    println!(
        "  {} {} sldu, {} sldl",
        "Districts:".bright_cyan(),
        stats.upper_chamber_features,
        stats.lower_chamber_features
    );
    println!(
        "  {} {}",
        "States:".bright_cyan(),
        stats.features_by_state.len()
    );
    if stats.duplicate_reference_keys > 0 {
        println!(
            "  {} {} (first occurrence kept)",
            "Duplicate reference keys:".bright_cyan(),
            stats.duplicate_reference_keys.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {} ({})",
        "Output:".bright_cyan(),
        stats.output_path.display(),
        format_size(stats.output_bytes)
    );
    println!(
        "  {} {:.2}s",
        "Elapsed:".bright_cyan(),
        stats.processing_time.as_secs_f64()
    );
}
