//! Expression errors, positioned by byte offset within the expression

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' in expression")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("'[' has no closing ']'")]
    UnclosedClass { offset: usize },

    #[error("invalid class reference '{text}'")]
    InvalidClassReference { text: String, offset: usize },

    #[error("unexpected '{found}' in expression")]
    UnexpectedToken { found: String, offset: usize },

    #[error("expression ends where {expected} was expected")]
    UnexpectedEnd { expected: &'static str },

    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize, offset: usize },
}

impl ExpressionError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Empty | Self::UnexpectedEnd { .. } => None,
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnclosedClass { offset }
            | Self::InvalidClassReference { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::TooDeep { offset, .. } => Some(*offset),
        }
    }
}
