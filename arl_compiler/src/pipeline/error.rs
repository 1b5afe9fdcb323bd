use crate::document::DocumentError;
use crate::file_processor::FileProcessorError;
use crate::logging::Code;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Document parsing failed: {0}")]
    Document(#[from] DocumentError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::Document(error) => error.error_code(),
        }
    }

    /// Name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileProcessing(_) => "file processing",
            Self::Document(_) => "document parsing",
        }
    }

    pub fn requires_halt(&self) -> bool {
        match self {
            Self::FileProcessing(error) => error.requires_halt(),
            Self::Document(error) => error.requires_halt(),
        }
    }

    pub fn severity(&self) -> &'static str {
        match self {
            Self::FileProcessing(error) => error.severity(),
            Self::Document(error) => error.severity(),
        }
    }
}
