//! Incremental GeoJSON FeatureCollection reading
//!
//! The combined legislative district file is far larger than is sensible to
//! hold in memory as one document, so features are parsed and handed off one
//! at a time. [`reader`] walks the collection synchronously through serde's
//! visitor machinery; [`stream`] runs that walk on the blocking pool and
//! exposes the features as an async [`futures::Stream`].

pub mod reader;
pub mod stream;


pub use reader::{FeatureReader, ReadSummary, SinkControl};
pub use stream::FeatureStream;
