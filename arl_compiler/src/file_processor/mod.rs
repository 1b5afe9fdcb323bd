//! Document file reading with compile-time limits

mod processor;

pub use processor::{
    is_arl_path, process_file, FileMetadata, FileProcessingResult, FileProcessor,
    FileProcessorError, ARL_EXTENSION,
};
