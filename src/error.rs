use std::path::PathBuf;

use dicom::core::Tag;
use thiserror::Error;

use crate::utils::format_tag;

/// The bytes at `path` could not be decoded as a DICOM instance.
#[derive(Debug, Clone, Error)]
#[error("{}: not a DICOM file ({reason})", .path.display())]
pub struct NotAMedicalImage {
    pub path: PathBuf,
    pub reason: String,
}

/// The pixel payload cannot be annotated without corrupting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelShapeError {
    #[error("missing attribute ({})", format_tag(*.0))]
    MissingAttribute(Tag),

    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    #[error("pixel data is {actual} bytes, declared shape needs {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Per-file failures after a file has been classified as DICOM.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    PixelShape(#[from] PixelShapeError),

    #[error("unable to create output directory {}: {source}", .dir.display())]
    DirectoryCreate {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("{} is not under input root {}", .path.display(), .root.display())]
    OutsideInputRoot { path: PathBuf, root: PathBuf },
}

/// Failures of the watcher lifecycle itself.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("input root does not exist or is not a directory: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("watcher already running")]
    AlreadyRunning,

    #[error("unable to spawn watcher worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("watcher worker thread panicked")]
    WorkerPanicked,

    #[error("unable to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
