//! Incremental FeatureCollection writer
//!
//! Features are appended one at a time between a fixed opening and closing
//! wrapper, so the whole collection never has to exist in memory. The writer
//! owns the "first feature" decision through its state:
//!
//! ```text
//! Init --write_feature--> Writing --finish--> Closed
//!   \_______________finish_______________/
//! ```
//!
//! There is no way back from `Closed`.

use crate::app::models::Feature;
use crate::constants::{
    COLLECTION_CLOSE, COLLECTION_OPEN, EMPTY_COLLECTION_CLOSE, FEATURE_SEPARATOR,
    FIRST_FEATURE_PREFIX,
};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Lifecycle of a [`CollectionWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing written yet
    Init,
    /// Opening wrapper and at least one feature written
    Writing,
    /// Closing wrapper written and sink shut down
    Closed,
}

/// Streams features into a syntactically valid FeatureCollection
#[derive(Debug)]
pub struct CollectionWriter<W> {
    inner: W,
    path: PathBuf,
    state: WriterState,
    features_written: usize,
    bytes_written: u64,
    buffer: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> CollectionWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            path: PathBuf::from("<output>"),
            state: WriterState::Init,
            features_written: 0,
            bytes_written: 0,
            buffer: Vec::with_capacity(64 * 1024),
        }
    }

    /// Label errors with the destination path
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Serialize and append one feature
    ///
    /// # Errors
    /// * `Error::WriterClosed` after [`finish`](Self::finish)
    /// * `Error::Io` if the sink rejects the write
    pub async fn write_feature(&mut self, feature: &Feature) -> Result<()> {
        let prefix = match self.state {
            WriterState::Init => {
                self.write_text(COLLECTION_OPEN).await?;
                self.state = WriterState::Writing;
                FIRST_FEATURE_PREFIX
            }
            WriterState::Writing => FEATURE_SEPARATOR,
            WriterState::Closed => return Err(Error::WriterClosed),
        };

        self.buffer.clear();
        self.buffer.extend_from_slice(prefix.as_bytes());
        serde_json::to_writer(&mut self.buffer, feature).map_err(|e| {
            Error::io(
                &self.path,
                format!("Failed to serialize feature #{}", self.features_written),
                e.into(),
            )
        })?;

        self.inner
            .write_all(&self.buffer)
            .await
            .map_err(|e| Error::io(&self.path, "Failed to write feature", e))?;
        self.bytes_written += self.buffer.len() as u64;
        self.features_written += 1;
        Ok(())
    }

    /// Write the closing wrapper, flush, and shut the sink down
    ///
    /// From `Init` this produces an empty collection. Returns the number of
    /// features written.
    pub async fn finish(&mut self) -> Result<usize> {
        match self.state {
            WriterState::Init => {
                self.write_text(COLLECTION_OPEN).await?;
                self.write_text(EMPTY_COLLECTION_CLOSE).await?;
            }
            WriterState::Writing => self.write_text(COLLECTION_CLOSE).await?,
            WriterState::Closed => return Err(Error::WriterClosed),
        }
        self.state = WriterState::Closed;

        self.inner
            .flush()
            .await
            .map_err(|e| Error::io(&self.path, "Failed to flush output", e))?;
        self.inner
            .shutdown()
            .await
            .map_err(|e| Error::io(&self.path, "Failed to close output", e))?;

        debug!(
            "Feature collection closed: {} features, {} bytes",
            self.features_written, self.bytes_written
        );
        Ok(self.features_written)
    }

    async fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .await
            .map_err(|e| Error::io(&self.path, "Failed to write collection wrapper", e))?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn features_written(&self) -> usize {
        self.features_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
