//! Configuration module for the ARL compiler
//! Compile-time limits come from the TOML profile processed by build.rs

// Generated by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ConfigError, FileProcessorPreferences, LoggingPreferences, ParserPreferences, RuntimeConfig,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("ARL_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("ARL_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(file_processing::MAX_FILE_SIZE > 0);
        assert!(file_processing::LARGE_FILE_THRESHOLD <= file_processing::MAX_FILE_SIZE);
        assert!(parsing::MAX_EXPRESSION_DEPTH > 0);
        assert!(logging::MAX_LOG_EVENTS_PER_FILE <= logging::LOG_BUFFER_SIZE);
    }

    #[test]
    fn test_build_info_source() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
