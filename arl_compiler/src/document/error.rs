use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Failures of document operations. Syntax errors concern the content;
/// the remaining variants concern how the document is used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Conclusion '{name}' not found")]
    ConclusionNotFound { name: String },

    #[error("Invalid variable mapping: {reason}")]
    InvalidMapping { reason: String },

    #[error("Failed to serialize document: {message}")]
    Serialization { message: String },
}

impl DocumentError {
    pub fn conclusion_not_found(name: &str) -> Self {
        Self::ConclusionNotFound {
            name: name.to_string(),
        }
    }

    pub fn invalid_mapping(reason: impl Into<String>) -> Self {
        Self::InvalidMapping {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Syntax(error) => error.error_code(),
            Self::ConclusionNotFound { .. } => codes::document::CONCLUSION_NOT_FOUND,
            Self::InvalidMapping { .. } => codes::document::INVALID_MAPPING,
            Self::Serialization { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::ConclusionNotFound { .. } | Self::InvalidMapping { .. }
        )
    }

    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(error) => Some(error),
            _ => None,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}
