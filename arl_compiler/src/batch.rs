//! Batch checking of ARL documents
//!
//! Discovers `.arl` files in a directory and runs each through the pipeline,
//! sequentially or on a bounded set of worker threads. Every file is
//! processed under its own logging file context so the cargo-style report
//! groups diagnostics per file.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::file_processor::is_arl_path;
use crate::logging::{codes, Code};
use crate::pipeline::{Pipeline, PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    /// Stop discovery after this many files
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: 1,
            recursive: false,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    /// Worker count for the available parallelism, capped by the build profile
    pub fn parallel() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(MAX_WORKER_THREADS),
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    pub fn with_recursion(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.max_threads > 1
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    /// Successful files whose documents still reference undefined names
    pub fn files_with_missing_references(&self) -> usize {
        self.successful_files
            .iter()
            .filter(|(_, result)| result.has_missing_references())
            .count()
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No .arl files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::DirectoryNotFound { .. } | Self::NoFilesFound { .. } | Self::IoError { .. } => {
                codes::batch::DIRECTORY_READ_FAILED
            }
            Self::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            Self::ThreadError { .. } => codes::batch::WORKER_FAILED,
        }
    }

    fn io(error: std::io::Error) -> Self {
        Self::IoError {
            error: error.to_string(),
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Sorted list of `.arl` files under `dir_path`
pub fn discover_arl_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config)?;

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    if files.len() > MAX_FILES_PER_BATCH {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        });
    }

    files.sort();

    crate::log_debug!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    config: &BatchConfig,
) -> Result<(), BatchError> {
    let mut entries = fs::read_dir(dir_path)
        .map_err(BatchError::io)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(BatchError::io)?;
    entries.sort();

    for path in entries {
        if reached_limit(files, config) {
            return Ok(());
        }

        if path.is_dir() {
            if config.recursive {
                visit_directory(&path, files, config)?;
            }
        } else if path.is_file() && is_arl_path(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn reached_limit(files: &[PathBuf], config: &BatchConfig) -> bool {
    match config.max_files {
        Some(max_files) if files.len() >= max_files => {
            crate::log_warning!(
                "Reached maximum file limit",
                "files_found" => files.len(),
                "limit" => max_files
            );
            true
        }
        _ => false,
    }
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Check every `.arl` file of a directory
pub fn process_directory(
    dir_path: &Path,
    pipeline: &Pipeline,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let files = discover_arl_files(dir_path, config)?;
    let mut results = process_files(&files, pipeline, config)?;
    results.files_discovered = files.len();
    Ok(results)
}

/// Check an explicit list of files
pub fn process_files(
    files: &[PathBuf],
    pipeline: &Pipeline,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if files.len() > MAX_FILES_PER_BATCH {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        });
    }

    let start_time = Instant::now();

    let mut results = if config.is_parallel() && files.len() > 1 {
        process_parallel(files, pipeline, config)?
    } else {
        process_sequential(files, pipeline, config)
    };

    results.files_discovered = files.len();
    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::BATCH_COMPLETED,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads" => config.max_threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

fn process_sequential(files: &[PathBuf], pipeline: &Pipeline, config: &BatchConfig) -> BatchResults {
    let mut results = BatchResults::new();

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Checking file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        match pipeline.process_file_with_id(file_path, file_id) {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                results.add_failure(file_path.clone(), error);
                if config.fail_fast {
                    crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
                    break;
                }
            }
        }
    }

    results
}

fn process_parallel(
    files: &[PathBuf],
    pipeline: &Pipeline,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let chunk_size = calculate_chunk_size(files.len(), config.max_threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => config.max_threads
    );

    let mut results = BatchResults::new();
    for (chunk_index, chunk) in files.chunks(chunk_size).enumerate() {
        let first_id = chunk_index * chunk_size;
        results.merge(process_chunk(chunk, first_id, pipeline, config)?);

        if config.fail_fast && results.failure_count() > 0 {
            crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    results.sort();
    Ok(results)
}

/// Spread one chunk over the worker threads
fn process_chunk(
    files: &[PathBuf],
    first_id: usize,
    pipeline: &Pipeline,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let results = Arc::new(Mutex::new(BatchResults::new()));
    let files_per_thread = files.len().div_ceil(config.max_threads);

    let mut handles = Vec::new();
    for (thread_index, thread_files) in files.chunks(files_per_thread).enumerate() {
        let thread_files = thread_files.to_vec();
        let start_id = first_id + thread_index * files_per_thread;
        let pipeline = pipeline.clone();
        let results = Arc::clone(&results);

        handles.push(thread::spawn(move || {
            for (offset, file_path) in thread_files.into_iter().enumerate() {
                let outcome = pipeline.process_file_with_id(&file_path, start_id + offset);
                let mut guard = results.lock().unwrap_or_else(PoisonError::into_inner);
                match outcome {
                    Ok(result) => guard.add_success(file_path, result),
                    Err(error) => guard.add_failure(file_path, error),
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            crate::log_error!(codes::batch::WORKER_FAILED, "Worker thread panicked");
            return Err(BatchError::ThreadError {
                message: "Thread panicked during processing".to_string(),
            });
        }
    }

    let results = Arc::try_unwrap(results).map_err(|_| BatchError::ThreadError {
        message: "Failed to collect results from worker threads".to_string(),
    })?;

    Ok(results.into_inner().unwrap_or_else(PoisonError::into_inner))
}

/// Files per chunk, bounded to keep memory use flat on large directories
fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    const MAX_CHUNK_SIZE: usize = 50;

    file_count
        .div_ceil(max_threads.max(1))
        .clamp(1, MAX_CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    const VALID: &str = "[features]\nA\n--> x :: is 1\n\n[rules]\nR1 := A[x]\n";
    const BROKEN: &str = "[rules]\nR1 A[x]\n";

    fn write_tree(root: &Path) {
        fs::write(root.join("one.arl"), VALID).unwrap();
        fs::write(root.join("two.arl"), VALID).unwrap();
        fs::write(root.join("notes.txt"), "not a document").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("three.arl"), BROKEN).unwrap();
    }

    #[test]
    fn test_file_discovery() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let flat = discover_arl_files(dir.path(), &BatchConfig::default()).unwrap();
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|f| f.extension().unwrap() == "arl"));

        let recursive_config = BatchConfig::default().with_recursion(true);
        let recursive = discover_arl_files(dir.path(), &recursive_config).unwrap();
        assert_eq!(recursive.len(), 3);
    }

    #[test]
    fn test_discovery_limit() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let config = BatchConfig {
            max_files: Some(1),
            ..BatchConfig::default()
        };
        assert_eq!(discover_arl_files(dir.path(), &config).unwrap().len(), 1);
    }

    #[test]
    fn test_discovery_errors() {
        let dir = tempdir().unwrap();

        let error = discover_arl_files(dir.path(), &BatchConfig::default()).unwrap_err();
        assert_matches!(error, BatchError::NoFilesFound { .. });
        assert_eq!(error.error_code().as_str(), "E501");

        assert_matches!(
            discover_arl_files(&dir.path().join("absent"), &BatchConfig::default()),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_sequential_directory() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let config = BatchConfig::default().with_recursion(true);
        let results = process_directory(dir.path(), &Pipeline::new(), &config).unwrap();

        assert_eq!(results.files_discovered, 3);
        assert_eq!(results.files_processed, 3);
        assert_eq!(results.success_count(), 2);
        assert_eq!(results.failure_count(), 1);
        assert!(results.failed_files[0].0.ends_with("three.arl"));
        assert_eq!(results.files_with_missing_references(), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        for index in 0..7 {
            let text = if index == 3 { BROKEN } else { VALID };
            fs::write(dir.path().join(format!("doc{}.arl", index)), text).unwrap();
        }

        let pipeline = Pipeline::new();
        let sequential =
            process_directory(dir.path(), &pipeline, &BatchConfig::default()).unwrap();
        let parallel = process_directory(
            dir.path(),
            &pipeline,
            &BatchConfig::default().with_threads(3),
        )
        .unwrap();

        assert_eq!(parallel.files_processed, 7);
        assert_eq!(parallel.success_count(), sequential.success_count());
        assert_eq!(parallel.failure_count(), 1);

        let names = |results: &BatchResults| -> Vec<PathBuf> {
            results.successful_files.iter().map(|(p, _)| p.clone()).collect()
        };
        assert_eq!(names(&parallel), names(&sequential));
    }

    #[test]
    fn test_fail_fast() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.arl"), BROKEN).unwrap();
        fs::write(dir.path().join("b.arl"), VALID).unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..BatchConfig::default()
        };
        let results = process_directory(dir.path(), &Pipeline::new(), &config).unwrap();

        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_process_explicit_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("one.arl");
        fs::write(&file, VALID).unwrap();

        let files = vec![file, dir.path().join("missing.arl")];
        let results = process_files(&files, &Pipeline::new(), &BatchConfig::default()).unwrap();

        assert_eq!(results.success_count(), 1);
        assert_eq!(results.failure_count(), 1);
        assert!((results.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 25);
        assert_eq!(calculate_chunk_size(10, 4), 3);
        assert_eq!(calculate_chunk_size(1, 4), 1);
        assert_eq!(calculate_chunk_size(200, 4), 50);
        assert_eq!(calculate_chunk_size(5, 0), 5);
    }

    #[test]
    fn test_thread_bounds() {
        assert_eq!(BatchConfig::default().with_threads(0).max_threads, 1);
        assert_eq!(
            BatchConfig::default().with_threads(usize::MAX).max_threads,
            MAX_WORKER_THREADS
        );
        assert!(BatchConfig::parallel().max_threads >= 1);
    }
}
