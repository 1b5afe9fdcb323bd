use super::output::PipelineOutput;
use crate::document::{Document, MissingCounts};
use crate::file_processor::FileMetadata;
use crate::logging::codes;
use std::time::Duration;

/// A document loaded from disk together with how it was loaded
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub document: Document,
    pub file_metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(document: Document, file_metadata: FileMetadata, processing_duration: Duration) -> Self {
        Self {
            document,
            file_metadata,
            processing_duration,
        }
    }

    pub fn missing_counts(&self) -> MissingCounts {
        self.document.to_interchange().missing_counts()
    }

    pub fn has_missing_references(&self) -> bool {
        self.missing_counts().total() > 0
    }

    pub fn output(&self) -> PipelineOutput {
        PipelineOutput::new(self.file_metadata.path.display().to_string(), &self.document)
    }

    pub fn log_success(&self) {
        let missing = self.missing_counts();
        crate::log_success!(
            codes::success::FILE_PROCESSING_SUCCESS,
            "Document processing pipeline succeeded",
            "file" => self.file_metadata.path.display(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0),
            "features" => self.document.features().len(),
            "rules" => self.document.rules().len(),
            "conclusions" => self.document.conclusions().len(),
            "missing_references" => missing.total()
        );
    }
}
