//! Shapefile archive downloads
//!
//! Fetches each planned [`ShapefileSource`] over HTTPS and streams the body
//! to disk. A body is written to `<destination>.part` first and renamed once
//! complete, so an interrupted download never leaves a truncated archive
//! under the final name.

use crate::app::services::shapefile_sources::ShapefileSource;
use crate::constants::{DOWNLOAD_TIMEOUT_SECS, DOWNLOAD_USER_AGENT, PARTIAL_DOWNLOAD_SUFFIX};
use crate::error::{Error, Result};
use futures::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

/// Totals for a completed download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub archives: usize,
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Sequential downloader for TIGER/Line shapefile archives
#[derive(Debug, Clone)]
pub struct ShapefileDownloader {
    client: reqwest::Client,
}

impl ShapefileDownloader {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DOWNLOAD_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                Error::configuration(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    /// Download one archive to its destination, returning the bytes written
    ///
    /// # Errors
    /// * `Error::Io` naming the destination if the request fails, the server
    ///   answers with a non-success status, or the file cannot be written
    pub async fn download(&self, source: &ShapefileSource) -> Result<u64> {
        debug!("GET {}", source.url);
        let request_error = |e: reqwest::Error| {
            Error::io(
                &source.destination,
                format!("Failed to download {}", source.url),
                std::io::Error::other(e),
            )
        };

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?;

        write_body(response.bytes_stream(), &source.destination).await
    }

    /// Download every source in order; the first failure stops the run
    pub async fn download_all(
        &self,
        sources: &[ShapefileSource],
        show_progress: bool,
    ) -> Result<DownloadStats> {
        let start_time = Instant::now();
        let progress_bar = show_progress.then(|| create_progress_bar(sources.len() as u64));
        let mut stats = DownloadStats::default();

        for source in sources {
            if let Some(pb) = &progress_bar {
                pb.set_message(format!("{} ({:?})", source.state, source.chamber));
            }

            stats.bytes += self.download(source).await?;
            stats.archives += 1;

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_with_message("archives downloaded");
        }

        stats.elapsed = start_time.elapsed();
        info!(
            "Downloaded {} archives ({} bytes) in {:.2}s",
            stats.archives,
            stats.bytes,
            stats.elapsed.as_secs_f64()
        );
        Ok(stats)
    }
}

/// Where a download is staged before it is renamed into place
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_DOWNLOAD_SUFFIX);
    destination.with_file_name(name)
}

/// Stream a response body to `destination` through its partial path
///
/// Parent directories are created as needed. On any error the partial file
/// is removed and `destination` is left untouched.
pub async fn write_body<S, B, E>(body: S, destination: &Path) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, "Failed to create download directory", e))?;
        }
    }

    let staging = partial_path(destination);
    let result = stream_to_file(body, &staging).await;
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&staging).await;
            return Err(e);
        }
    };

    fs::rename(&staging, destination)
        .await
        .map_err(|e| Error::io(destination, "Failed to move download into place", e))?;
    debug!("Wrote {} bytes to {}", bytes, destination.display());
    Ok(bytes)
}

async fn stream_to_file<S, B, E>(body: S, path: &Path) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let file = fs::File::create(path)
        .await
        .map_err(|e| Error::io(path, "Failed to create download file", e))?;
    let mut writer = BufWriter::new(file);
    let mut total_bytes = 0u64;

    let mut body = std::pin::pin!(body);
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| {
            Error::io(path, "Error reading response stream", std::io::Error::other(e))
        })?;
        let chunk = chunk.as_ref();
        writer
            .write_all(chunk)
            .await
            .map_err(|e| Error::io(path, "Error writing to file", e))?;
        total_bytes += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| Error::io(path, "Failed to flush download", e))?;
    Ok(total_bytes)
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::shapefile_sources::{Chamber, plan_sources};
    use futures::stream;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("data/tl_2018_06_sldu.zip")),
            PathBuf::from("data/tl_2018_06_sldu.zip.part")
        );
    }

    #[tokio::test]
    async fn test_write_body_to_planned_destination() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let sources = plan_sources(2018, &data_dir);
        let california_upper = sources
            .iter()
            .find(|s| s.fips == "06" && s.chamber == Chamber::Upper)
            .unwrap();

        let chunks: Vec<io::Result<Vec<u8>>> =
            vec![Ok(b"PK\x03\x04".to_vec()), Ok(vec![0u8; 1024])];
        let written = write_body(stream::iter(chunks), &california_upper.destination)
            .await
            .unwrap();

        assert_eq!(written, 1028);
        let expected = data_dir.join("tl_2018_06_sldu.zip");
        assert_eq!(california_upper.destination, expected);
        assert_eq!(std::fs::read(&expected).unwrap().len(), 1028);
        assert!(!partial_path(&expected).exists());
    }

    #[tokio::test]
    async fn test_failed_body_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("tl_2018_31_sldu.zip");

        let chunks: Vec<io::Result<Vec<u8>>> = vec![
            Ok(b"PK".to_vec()),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ];
        let result = write_body(stream::iter(chunks), &destination).await;

        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_invalid_url_is_io_error_naming_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = ShapefileSource {
            state: "Nowhere",
            fips: "00",
            chamber: Chamber::Lower,
            url: "not a url".to_string(),
            destination: temp_dir.path().join("tl_2018_00_sldl.zip"),
        };

        let downloader = ShapefileDownloader::new().unwrap();
        let error = downloader.download(&source).await.unwrap_err();

        match &error {
            Error::Io { path, message, .. } => {
                assert_eq!(path, &source.destination);
                assert!(message.contains("not a url"));
            }
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(!source.destination.exists());
    }

    #[tokio::test]
    async fn test_download_all_empty_plan() {
        let downloader = ShapefileDownloader::new().unwrap();
        let stats = downloader.download_all(&[], false).await.unwrap();
        assert_eq!(stats.archives, 0);
        assert_eq!(stats.bytes, 0);
    }
}
