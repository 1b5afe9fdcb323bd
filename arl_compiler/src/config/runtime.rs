// RUNTIME PREFERENCES (User Experience)

use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read a boolean preference from the environment, falling back to `default`.
fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without the .arl extension
    pub require_arl_extension: bool,

    /// Whether to log a warning for files above the large-file threshold
    pub warn_on_large_files: bool,

    /// Whether to log timing information per processed file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_arl_extension: env_flag(env_vars::REQUIRE_ARL_EXTENSION, true),
            warn_on_large_files: env_flag(env_vars::LARGE_FILE_WARNINGS, true),
            enable_performance_logging: env_flag(env_vars::PERFORMANCE_LOGGING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether numeric features get filler classes so their ranges tile the real line
    pub complete_ranges: bool,

    /// Whether a missing reference is logged as a warning event
    pub warn_on_missing_references: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            complete_ranges: env_flag(env_vars::COMPLETE_RANGES, true),
            warn_on_missing_references: env_flag(env_vars::WARN_MISSING_REFERENCES, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether to echo events to the console
    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,

    /// Whether to print a cargo-style diagnostic summary after processing
    pub enable_cargo_style_output: bool,

    /// Whether to attach the current file path to log events
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML; sections and keys left out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_ARL_EXTENSION: &str = "ARL_REQUIRE_ARL_EXTENSION";
    pub const LARGE_FILE_WARNINGS: &str = "ARL_LARGE_FILE_WARNINGS";
    pub const PERFORMANCE_LOGGING: &str = "ARL_PERFORMANCE_LOGGING";

    // Parser
    pub const COMPLETE_RANGES: &str = "ARL_COMPLETE_RANGES";
    pub const WARN_MISSING_REFERENCES: &str = "ARL_WARN_MISSING_REFERENCES";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ARL_STRUCTURED_LOGGING";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ARL_CONSOLE_LOGGING";
    pub const LOGGING_MIN_LEVEL: &str = "ARL_LOG_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "ARL_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "ARL_INCLUDE_FILE_CONTEXT";
}
