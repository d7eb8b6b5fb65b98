use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{NotAMedicalImage, TransformError};
use crate::image_pipeline::PixelAnnotator;
use crate::model::descriptors;
use crate::model::loader::classify;
use crate::model::MedicalImageRecord;
use crate::path_mapper::ensure_parent_dir;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub enum TransformResult {
    Written { output: PathBuf },
    Skipped(NotAMedicalImage),
    Failed(TransformError),
}

impl TransformResult {
    pub fn is_written(&self) -> bool {
        matches!(self, TransformResult::Written { .. })
    }

    /// Emits the operator-facing line for this outcome.
    pub fn report(&self, input: &Path) {
        match self {
            TransformResult::Written { output } => {
                log::info!("File saved to {}", output.display());
            }
            TransformResult::Skipped(err) => {
                log::warn!(
                    "The provided file is not a valid DICOM file: {} ({})",
                    input.display(),
                    err.reason
                );
            }
            TransformResult::Failed(TransformError::PixelShape(err)) => {
                log::warn!(
                    "The provided file is not a valid DICOM file to modify: {} ({err})",
                    input.display()
                );
            }
            TransformResult::Failed(err) => log::error!("{err}"),
        }
    }
}

/// Classify, rewrite descriptors, annotate pixels, write the mirrored copy.
///
/// Holds no per-file state; each [`TransformPipeline::run`] decodes a fresh record.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    config: PipelineConfig,
}

impl TransformPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline for `input` and reports the outcome.
    pub fn run(&self, input: &Path) -> TransformResult {
        let result = match classify(input) {
            Ok(mut record) => match self.transform(&mut record) {
                Ok(output) => TransformResult::Written { output },
                Err(err) => TransformResult::Failed(err),
            },
            Err(err) => TransformResult::Skipped(err),
        };
        result.report(input);
        result
    }

    /// [`TransformPipeline::run`], with a panic inside the run logged and
    /// turned into `None` so the caller can move on to the next file.
    pub fn run_contained(&self, input: &Path) -> Option<TransformResult> {
        contain_panic(input, || self.run(input))
    }

    fn transform(&self, record: &mut MedicalImageRecord) -> Result<PathBuf, TransformError> {
        descriptors::mutate(record);
        PixelAnnotator::annotate(record, &self.config.annotation_text)?;

        let output = self.config.roots.map(record.source())?;
        ensure_parent_dir(&output)?;
        record
            .write_to_file(&output)
            .map_err(|reason| TransformError::Write {
                path: output.clone(),
                reason,
            })?;
        Ok(output)
    }
}

fn contain_panic<F>(input: &Path, run: F) -> Option<TransformResult>
where
    F: FnOnce() -> TransformResult,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => Some(result),
        Err(_) => {
            log::error!("Pipeline panicked while processing {}", input.display());
            None
        }
    }
}
