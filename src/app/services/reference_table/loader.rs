//! Reference table loading
//!
//! Reads OCD-ID CSV files into [`ReferenceTable`]s. Both chamber tables are
//! small next to the feature stream and are held fully in memory.

use super::{DistrictReferences, ReferenceRow, ReferenceTable};
use crate::constants::{ID_COLUMN, KEY_COLUMN};
use crate::error::{Error, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

impl ReferenceTable {
    /// Load a reference table from a CSV file with a header row
    ///
    /// # Errors
    /// * `Error::Io` if the file is missing or unreadable
    /// * `Error::CsvParsing` for a malformed header or record
    /// * `Error::MissingColumn` if `census_geoid_14` or `id` is absent
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading reference table: {}", path.display());
        let start_time = Instant::now();

        let file = File::open(path)
            .map_err(|e| Error::io(path, "Failed to open reference table", e))?;
        let table = Self::from_reader(file, path)?;

        info!(
            "Loaded {} reference rows from {} in {:.2}s",
            table.len(),
            path.display(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(table)
    }

    /// Parse a reference table from any reader; `path` labels errors and logs
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::csv_parsing(path, "Failed to read header row", e))?
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let header = if i == 0 {
                    header.trim_start_matches('\u{feff}')
                } else {
                    header
                };
                header.to_string()
            })
            .collect();

        let key_position = column_position(&headers, KEY_COLUMN, path)?;
        let id_position = column_position(&headers, ID_COLUMN, path)?;

        let mut table = ReferenceTable::new(path, headers);
        let mut record = StringRecord::new();
        let mut line = 1;

        while reader.read_record(&mut record).map_err(|e| {
            Error::csv_parsing(path, format!("Failed to read record after line {}", line), e)
        })? {
            line += 1;

            let row = ReferenceRow {
                census_geoid_14: record.get(key_position).unwrap_or_default().to_string(),
                id: record.get(id_position).unwrap_or_default().to_string(),
                values: record.iter().map(str::to_string).collect(),
            };

            if !table.push_row(row) {
                warn!(
                    "Duplicate key '{}' at line {} of {}, keeping first row",
                    record.get(key_position).unwrap_or_default(),
                    line,
                    path.display()
                );
            }
        }

        Ok(table)
    }
}

fn column_position(headers: &[String], column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| Error::missing_column(path, column))
}

impl DistrictReferences {
    /// Load the upper and lower chamber tables concurrently
    pub async fn load(sldu_path: &Path, sldl_path: &Path) -> Result<Self> {
        let (sldu, sldl) = tokio::try_join!(
            load_blocking(sldu_path.to_path_buf()),
            load_blocking(sldl_path.to_path_buf()),
        )?;

        let references = Self::new(sldu, sldl);
        if references.duplicate_keys() > 0 {
            warn!(
                "{} duplicate reference keys ignored (first row wins)",
                references.duplicate_keys()
            );
        }
        Ok(references)
    }
}

async fn load_blocking(path: PathBuf) -> Result<ReferenceTable> {
    let label = path.display().to_string();
    task::spawn_blocking(move || ReferenceTable::load(&path))
        .await
        .map_err(|e| Error::reader_task(format!("Loading {} failed: {}", label, e)))?
}
