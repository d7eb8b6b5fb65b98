use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::error::TransformError;
use crate::image_pipeline::DEFAULT_TEXT;
use crate::path_mapper::map_output_path;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Input and output roots related by mirroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl PathPair {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// True when written files land inside the watched tree and can re-trigger
    /// the pipeline.
    pub fn overlaps(&self) -> bool {
        let input = normalized(&self.input_root);
        let output = normalized(&self.output_root);
        output.starts_with(&input)
    }

    pub fn map(&self, input_path: &Path) -> Result<PathBuf, TransformError> {
        map_output_path(input_path, &self.input_root, &self.output_root)
    }
}

fn normalized(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Everything the pipeline and the watcher need for their lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub roots: PathPair,
    pub poll_interval: Duration,
    /// Only paths with this extension are handed to the pipeline when set.
    pub extension: Option<String>,
    pub annotation_text: String,
}

impl PipelineConfig {
    pub fn new(roots: PathPair) -> Self {
        Self {
            roots,
            poll_interval: DEFAULT_POLL_INTERVAL,
            extension: None,
            annotation_text: DEFAULT_TEXT.to_string(),
        }
    }

    pub fn accepts_extension(&self, path: &Path) -> bool {
        let Some(wanted) = &self.extension else {
            return true;
        };
        let wanted = wanted.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }
}

/// Command-line arguments for dicomwatch
#[derive(Parser, Debug)]
#[command(name = "dicomwatch")]
#[command(about = "Watches a folder for DICOM files and writes annotated copies to a mirrored folder")]
#[command(version)]
pub struct Cli {
    /// Folder watched for new or modified files
    #[arg(short, long, global = true, default_value = "INPUT", env = "DICOMWATCH_INPUT")]
    pub input: PathBuf,

    /// Folder receiving the annotated copies
    #[arg(short, long, global = true, default_value = "OUTPUT", env = "DICOMWATCH_OUTPUT")]
    pub output: PathBuf,

    /// Polling interval in milliseconds
    #[arg(long, global = true, default_value = "1000", env = "DICOMWATCH_POLL_MS")]
    pub poll_interval_ms: u64,

    /// Only process files with this extension (e.g. `dcm`)
    #[arg(long, global = true, env = "DICOMWATCH_EXTENSION")]
    pub extension: Option<String>,

    /// Text burned into the pixel data
    #[arg(long, global = true, default_value = DEFAULT_TEXT, env = "DICOMWATCH_TEXT")]
    pub text: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Watch the input folder until interrupted (default)
    Watch,
    /// Run the pipeline once over the given files
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            roots: PathPair::new(&self.input, &self.output),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            extension: self.extension.clone(),
            annotation_text: self.text.clone(),
        }
    }
}
