//! File to document pipeline: read, parse, log
//!
//! Every call runs inside a logging file context so the events of the
//! parsers are collected under the file they came from.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;

use crate::config::RuntimeConfig;
use crate::document::{Document, DocumentParser};
use crate::file_processor::FileProcessor;
use crate::logging;
use std::path::Path;
use std::time::Instant;

/// File processor and parser settings for one run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub file_processor: FileProcessor,
    pub parser: DocumentParser,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            file_processor: FileProcessor::from_preferences(&config.file_processor),
            parser: DocumentParser::from_preferences(&config.parser),
        }
    }

    pub fn with_parser(mut self, parser: DocumentParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn process_file(&self, file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
        self.process_file_with_id(file_path, 0)
    }

    /// `file_id` identifies the file in the collected diagnostics
    pub fn process_file_with_id(
        &self,
        file_path: impl AsRef<Path>,
        file_id: usize,
    ) -> Result<PipelineResult, PipelineError> {
        let file_path = file_path.as_ref();
        let start_time = Instant::now();

        logging::with_file_context(file_path.to_path_buf(), file_id, || {
            crate::log_info!("Starting document processing pipeline", "file" => file_path.display());

            let file_result = self.file_processor.process_file(file_path)?;
            let document = self.parser.parse(&file_result.source)?;

            let result = PipelineResult::new(document, file_result.metadata, start_time.elapsed());
            result.log_success();

            Ok(result)
        })
    }

    /// Parse in-memory text with the pipeline's parser settings
    pub fn process_source(&self, source: &str) -> Result<Document, PipelineError> {
        Ok(self.parser.parse(source)?)
    }
}

/// Process a single file with preferences taken from the environment
pub fn process_file(file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    Pipeline::from_config(&RuntimeConfig::default()).process_file(file_path)
}
