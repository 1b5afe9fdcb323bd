//! Error, warning and success codes with their classification metadata
//!
//! Every code the compiler emits is declared here together with the metadata
//! used by log formatting and by `error_code()` on the stage error types.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Features section syntax
pub mod features {
    use super::Code;

    pub const INVALID_FEATURE_NAME: Code = Code::new("E101");
    pub const INVALID_CLASS_LINE: Code = Code::new("E102");
    pub const INVALID_CLASS_DEFINITION: Code = Code::new("E103");
    pub const TOO_MANY_CLASSES: Code = Code::new("E104");
}

/// Rules and conclusions line grammar
pub mod statements {
    use super::Code;

    pub const INVALID_STATEMENT: Code = Code::new("E201");
    pub const MISSING_CONCLUSION_CLASS: Code = Code::new("E202");
    pub const STATEMENT_TOO_LONG: Code = Code::new("E203");
}

/// Boolean expression grammar
pub mod expression {
    use super::Code;

    pub const INVALID_EXPRESSION: Code = Code::new("E301");
    pub const EXPRESSION_TOO_DEEP: Code = Code::new("E302");
}

/// Document usage errors
pub mod document {
    use super::Code;

    pub const CONCLUSION_NOT_FOUND: Code = Code::new("E401");
    pub const INVALID_MAPPING: Code = Code::new("E402");
}

pub mod batch {
    use super::Code;

    pub const DIRECTORY_READ_FAILED: Code = Code::new("E501");
    pub const TOO_MANY_FILES: Code = Code::new("E502");
    pub const WORKER_FAILED: Code = Code::new("E503");
}

/// Soft diagnostics that never abort a parse
pub mod warnings {
    use super::Code;

    pub const MISSING_FEATURE: Code = Code::new("W101");
    pub const MISSING_CLASS: Code = Code::new("W102");
    pub const MISSING_RULE: Code = Code::new("W103");
    pub const RULE_CLASS_IGNORED: Code = Code::new("W104");
    pub const LARGE_FILE: Code = Code::new("W105");
    pub const CONCLUSION_NAMES_MERGED: Code = Code::new("W106");
    pub const RANGE_COMPLETION_SKIPPED: Code = Code::new("W107");
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FEATURES_PARSED: Code = Code::new("I110");
    pub const RANGE_COMPLETED: Code = Code::new("I111");
    pub const RULES_PARSED: Code = Code::new("I120");
    pub const CONCLUSIONS_PARSED: Code = Code::new("I130");
    pub const DOCUMENT_PARSED: Code = Code::new("I140");
    pub const DOCUMENT_REMAPPED: Code = Code::new("I141");
    pub const DOCUMENT_SLICED: Code = Code::new("I142");
    pub const BATCH_COMPLETED: Code = Code::new("I150");
}

// ============================================================================
// REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

const REGISTERED: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the input document attached",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "System initialization failure",
        "Check logging configuration and environment variables",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "File not found",
        "Check the file path and try again",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Severity::Medium,
        true,
        false,
        "File does not have the .arl extension",
        "Rename the file or set ARL_REQUIRE_ARL_EXTENSION=false",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "File exceeds the maximum allowed size",
        "Split the knowledge document or raise max_file_size in the build profile",
    ),
    ErrorMetadata::new(
        "E008",
        "FileProcessing",
        Severity::Medium,
        true,
        false,
        "File is empty",
        "Add at least one section to the document",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Permission denied reading file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E010",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "File is not valid UTF-8",
        "Re-save the document with UTF-8 encoding",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading file",
        "Check that the file is readable and retry",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Invalid file path",
        "Provide a path to a regular file",
    ),
    ErrorMetadata::new(
        "E013",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "File has too many lines",
        "Split the knowledge document or raise max_line_count in the build profile",
    ),
    // Features
    ErrorMetadata::new(
        "E101",
        "FeatureSyntax",
        Severity::High,
        false,
        true,
        "Invalid feature name",
        "Feature names may contain letters, digits, underscores, spaces, dots and hyphens",
    ),
    ErrorMetadata::new(
        "E102",
        "FeatureSyntax",
        Severity::High,
        false,
        true,
        "Malformed class line",
        "Class lines have the form '--> <class> :: <definition>'",
    ),
    ErrorMetadata::new(
        "E103",
        "FeatureSyntax",
        Severity::High,
        false,
        true,
        "Invalid class definition",
        "Use '<min> to <max>' for intervals or 'is <value>' for points",
    ),
    ErrorMetadata::new(
        "E104",
        "FeatureSyntax",
        Severity::High,
        false,
        true,
        "Feature declares too many classes",
        "Reduce the number of classes or raise max_feature_classes",
    ),
    // Statements
    ErrorMetadata::new(
        "E201",
        "StatementSyntax",
        Severity::High,
        false,
        true,
        "Malformed rule or conclusion line",
        "Statements have the form '<name>[<class>] := <expression> [for <sign><number> <unit>]'",
    ),
    ErrorMetadata::new(
        "E202",
        "StatementSyntax",
        Severity::High,
        false,
        true,
        "Conclusion line has no class",
        "Write conclusions as '<name>[<class>] := <expression>'",
    ),
    ErrorMetadata::new(
        "E203",
        "StatementSyntax",
        Severity::High,
        false,
        true,
        "Statement line is too long",
        "Split the expression into intermediate rules",
    ),
    // Expressions
    ErrorMetadata::new(
        "E301",
        "ExpressionSyntax",
        Severity::High,
        false,
        true,
        "Malformed boolean expression",
        "Combine references with '&', '|' and balanced parentheses",
    ),
    ErrorMetadata::new(
        "E302",
        "ExpressionSyntax",
        Severity::High,
        false,
        true,
        "Expression nesting too deep",
        "Flatten the expression using intermediate rules",
    ),
    // Document usage
    ErrorMetadata::new(
        "E401",
        "DocumentUsage",
        Severity::Medium,
        true,
        false,
        "Conclusion not found in document",
        "List available conclusions and check the spelling",
    ),
    ErrorMetadata::new(
        "E402",
        "DocumentUsage",
        Severity::Medium,
        true,
        false,
        "Invalid variable mapping",
        "Mapping keys must be non-empty and targets must be unique",
    ),
    // Batch
    ErrorMetadata::new(
        "E501",
        "Batch",
        Severity::High,
        false,
        true,
        "Failed to read directory",
        "Check the directory path and permissions",
    ),
    ErrorMetadata::new(
        "E502",
        "Batch",
        Severity::Medium,
        true,
        false,
        "Too many files in batch",
        "Process the directory in smaller parts",
    ),
    ErrorMetadata::new(
        "E503",
        "Batch",
        Severity::High,
        false,
        false,
        "Batch worker thread failed",
        "Re-run the batch sequentially to isolate the failing file",
    ),
    // Warnings
    ErrorMetadata::new(
        "W101",
        "References",
        Severity::Low,
        true,
        false,
        "Referenced feature is not defined",
        "Define the feature in the [features] section",
    ),
    ErrorMetadata::new(
        "W102",
        "References",
        Severity::Low,
        true,
        false,
        "Referenced class is not defined for the feature",
        "Add the class to the feature or fix the class name",
    ),
    ErrorMetadata::new(
        "W103",
        "References",
        Severity::Low,
        true,
        false,
        "Referenced rule is not defined before use",
        "Define the rule on an earlier line of the [rules] section",
    ),
    ErrorMetadata::new(
        "W104",
        "StatementSyntax",
        Severity::Low,
        true,
        false,
        "Class on a rule line is ignored",
        "Remove the [class] suffix from the rule name",
    ),
    ErrorMetadata::new(
        "W105",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "File is larger than the large-file threshold",
        "No action required",
    ),
    ErrorMetadata::new(
        "W106",
        "References",
        Severity::Low,
        true,
        false,
        "Conclusion names collapse to the same canonical name",
        "Rename one of the conclusions",
    ),
    ErrorMetadata::new(
        "W107",
        "FeatureSyntax",
        Severity::Low,
        true,
        false,
        "Range completion skipped for a feature with non-numeric bounds",
        "Resolve symbolic bounds before training",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTERED
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_no_duplicate_codes() {
        let unique: HashSet<_> = REGISTERED.iter().map(|m| m.code).collect();
        assert_eq!(unique.len(), REGISTERED.len());
    }

    #[test]
    fn test_syntax_codes_halt() {
        assert!(requires_halt(features::INVALID_FEATURE_NAME.as_str()));
        assert!(requires_halt(statements::INVALID_STATEMENT.as_str()));
        assert!(!requires_halt(warnings::MISSING_FEATURE.as_str()));
        assert_eq!(get_category(expression::INVALID_EXPRESSION.as_str()), "ExpressionSyntax");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert_eq!(get_description("X999"), "Unknown error");
        assert!(get_error_metadata("X999").is_none());
    }
}
