//! Async feature stream backed by a blocking parse task

use super::reader::{FeatureReader, SinkControl};
use crate::app::models::Feature;
use crate::constants::READ_BUFFER_SIZE;
use crate::error::{Error, Result};
use futures::Stream;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::debug;

/// Lazy, finite, non-restartable stream of features from one collection
///
/// A parse failure arrives as an `Err` item and is the last item of the
/// stream. The bounded channel keeps at most `capacity` parsed features
/// ahead of the consumer.
#[derive(Debug)]
pub struct FeatureStream {
    receiver: mpsc::Receiver<Result<Feature>>,
    task: Option<JoinHandle<()>>,
    path: PathBuf,
}

impl FeatureStream {
    /// Open a GeoJSON file and start parsing it in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(path: &Path, capacity: usize) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| Error::io(path, "Failed to open GeoJSON input", e))?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        Ok(Self::from_reader(reader, path, capacity))
    }

    /// Stream features from any reader; `path` labels errors
    pub fn from_reader<R>(reader: R, path: &Path, capacity: usize) -> Self
    where
        R: Read + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let label = path.to_path_buf();

        let task = task::spawn_blocking(move || {
            let result = FeatureReader::new(reader, label.clone()).read_features(|feature| {
                match sender.blocking_send(Ok(feature)) {
                    Ok(()) => SinkControl::Continue,
                    Err(_) => SinkControl::Stop,
                }
            });

            match result {
                Ok(summary) => debug!(
                    "Parsed {} features from {} (stopped early: {})",
                    summary.features,
                    label.display(),
                    summary.stopped_early
                ),
                Err(e) => {
                    // Receiver may already be gone; nothing left to report to.
                    let _ = sender.blocking_send(Err(e));
                }
            }
        });

        Self {
            receiver,
            task: Some(task),
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the parse task after the stream is exhausted
    ///
    /// A panic in the parse task closes the channel just like a clean end of
    /// input would; this is where the two are told apart.
    pub async fn finish(mut self) -> Result<()> {
        self.receiver.close();
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| {
                Error::reader_task(format!("Parsing {} failed: {}", self.path.display(), e))
            })?;
        }
        Ok(())
    }
}

impl Stream for FeatureStream {
    type Item = Result<Feature>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
