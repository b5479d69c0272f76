//! Main join engine with a streaming pipeline.
//!
//! Orchestrates a complete run: reference table loading, GeoJSON streaming,
//! enrichment, and incremental FeatureCollection output. Features move
//! through one at a time and in input order; nothing is retained once it
//! has been written.

#[cfg(test)]
pub mod tests;

use crate::app::models::JoinStats;
use crate::app::services::collection_writer::CollectionWriter;
use crate::app::services::enrichment::Enricher;
use crate::app::services::feature_stream::FeatureStream;
use crate::app::services::reference_table::DistrictReferences;
use crate::config::JoinConfig;
use crate::constants::{PROGRESS_UPDATE_INTERVAL, WRITE_BUFFER_SIZE};
use crate::error::{Error, Result};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::BufWriter;
use tracing::{debug, info};

/// Runs the district OCD-ID join described by a [`JoinConfig`]
#[derive(Debug, Clone)]
pub struct JoinProcessor {
    config: JoinConfig,
}

impl JoinProcessor {
    /// Create a processor; the configuration is validated up front
    pub fn new(config: JoinConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Main processing entry point
    ///
    /// Any error aborts the run immediately. The output file is then left
    /// without its closing wrapper and should be treated as invalid.
    pub async fn run(&self) -> Result<JoinStats> {
        let start_time = Instant::now();
        let config = &self.config;

        info!(
            "Joining {} with {} and {}",
            config.geojson_path.display(),
            config.sldu_csv_path.display(),
            config.sldl_csv_path.display()
        );

        // Step 1: Load reference tables
        let references =
            DistrictReferences::load(&config.sldu_csv_path, &config.sldl_csv_path).await?;
        info!(
            "Reference tables loaded: {} upper, {} lower rows",
            references.sldu.len(),
            references.sldl.len()
        );

        // Step 2: Start streaming features
        let mut features = FeatureStream::open(&config.geojson_path, config.channel_capacity)?;

        // Step 3: Prepare output
        if let Some(parent) = config.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::io(parent, "Failed to create output directory", e)
                })?;
            }
        }
        let file = fs::File::create(&config.output_path)
            .await
            .map_err(|e| Error::io(&config.output_path, "Failed to create output file", e))?;
        let mut writer =
            CollectionWriter::new(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file))
                .with_path(&config.output_path);

        // Step 4: Enrich and write, one feature at a time
        let enricher = Enricher::new(&references, &config.upper_chamber_mtfcc);
        let progress_bar = config.show_progress.then(create_progress_bar);

        let mut stats = JoinStats {
            upper_reference_rows: references.sldu.len(),
            lower_reference_rows: references.sldl.len(),
            duplicate_reference_keys: references.duplicate_keys(),
            output_path: config.output_path.clone(),
            ..Default::default()
        };

        while let Some(item) = features.next().await {
            let feature_index = writer.features_written();
            let (enriched, outcome) = enricher.enrich(item?, feature_index)?;
            writer.write_feature(&enriched).await?;
            stats.record(&outcome);

            if let Some(pb) = &progress_bar {
                let written = writer.features_written() as u64;
                if written % PROGRESS_UPDATE_INTERVAL == 0 {
                    pb.set_position(written);
                }
            }
        }

        // Step 5: End of input; close out
        features.finish().await?;
        let written = writer.finish().await?;

        if let Some(pb) = &progress_bar {
            pb.set_position(written as u64);
            pb.finish_with_message("features written");
        }

        stats.output_bytes = writer.bytes_written();
        stats.processing_time = start_time.elapsed();

        debug!("Features by state: {:?}", stats.features_by_state);
        info!(
            "Wrote {} features to {} ({} matched, {} unmatched) in {:.2}s",
            stats.features_written,
            config.output_path.display(),
            stats.matched(),
            stats.unmatched,
            stats.processing_time.as_secs_f64()
        );

        Ok(stats)
    }
}

fn create_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    progress_bar.set_message("features");
    progress_bar.enable_steady_tick(Duration::from_millis(120));
    progress_bar
}
