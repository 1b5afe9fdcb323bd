//! Reads ARL documents from disk within the compile-time size limits

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

pub const ARL_EXTENSION: &str = "arl";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .arl, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::EmptyFile => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: std::io::Error, action: &str) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::InvalidData => Self::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                message: format!("Failed to {} '{}': {}", action, path.display(), error),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_arl_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_arl_extension: bool,
    pub warn_on_large_files: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_arl_extension: true,
            warn_on_large_files: true,
            enable_performance_logging: false,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_arl_extension: prefs.require_arl_extension,
            warn_on_large_files: prefs.warn_on_large_files,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_arl_extension_required(mut self, required: bool) -> Self {
        self.require_arl_extension = required;
        self
    }

    pub fn with_large_file_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_large_files = enabled;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Validate and read a document file
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display);

        let result = self
            .validate_path(file_path)
            .and_then(|path| self.read_metadata(&path))
            .and_then(|metadata| self.validate_file(metadata))
            .and_then(|metadata| self.read_source(metadata));

        let (source, metadata) = match result {
            Ok(read) => read,
            Err(error) => {
                log_error!(error.error_code(), "File processing failed",
                    "file" => display,
                    "error" => error
                );
                return Err(error);
            }
        };

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => display,
                "size" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "duration_ms" => format!("{:.3}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => display,
                "lines" => result.metadata.line_count
            );
        }

        Ok(result)
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() || (file_path.exists() && !file_path.is_file()) {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            });
        }

        if !file_path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: file_path.display().to_string(),
            });
        }

        file_path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(file_path, e, "resolve path"))
    }

    fn read_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path)
            .map_err(|e| FileProcessorError::from_io(path, e, "read metadata for"))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let is_arl_file = extension.as_deref() == Some(ARL_EXTENSION);

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_arl_file,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(&self, metadata: FileMetadata) -> Result<FileMetadata, FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile);
        }

        if self.require_arl_extension && !metadata.is_arl_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension,
            });
        }

        if self.warn_on_large_files && metadata.is_large_file() {
            log_warning!(code = codes::warnings::LARGE_FILE, "Large document file",
                "file" => metadata.path.display(),
                "size" => metadata.human_readable_size(),
                "threshold" => human_readable(LARGE_FILE_THRESHOLD)
            );
        }

        Ok(metadata)
    }

    fn read_source(
        &self,
        mut metadata: FileMetadata,
    ) -> Result<(String, FileMetadata), FileProcessorError> {
        let source = fs::read_to_string(&metadata.path)
            .map_err(|e| FileProcessorError::from_io(&metadata.path, e, "read"))?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }

        metadata.line_count = line_count;
        Ok((source, metadata))
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn process_file(file_path: impl AsRef<Path>) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn is_arl_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARL_EXTENSION))
}
