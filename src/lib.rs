//! Watches a folder for DICOM instances and writes "seen by AI" annotated
//! copies to a mirrored output folder.

pub mod app;
pub mod config;
pub mod error;
pub mod image_pipeline;
pub mod model;
pub mod path_mapper;
pub mod pipeline;
pub mod utils;
pub mod watcher;

#[cfg(test)]
mod test_support;

pub use config::{PathPair, PipelineConfig};
pub use error::{NotAMedicalImage, PixelShapeError, TransformError, WatchError};
pub use pipeline::{TransformPipeline, TransformResult};
pub use watcher::{DirectoryWatcher, ProcessedEvent};
