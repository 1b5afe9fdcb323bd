//! Fatal syntax errors raised while parsing a document section
//!
//! Every variant identifies the failing section and its 1-based line number
//! within that section's text.

use super::Section;
use crate::expression::ExpressionError;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Syntax Error in Features line {line}: invalid feature name '{name}'")]
    InvalidFeatureName { line: usize, name: String },

    #[error("Syntax Error in Features line {line}: expected '--> <class> :: <definition>', found '{text}'")]
    InvalidClassLine { line: usize, text: String },

    #[error("Syntax Error in Features line {line}: class '{class_name}' has no allowed form: '{definition}'")]
    InvalidClassDefinition {
        line: usize,
        class_name: String,
        definition: String,
    },

    #[error("Syntax Error in Features line {line}: feature '{feature}' declares {count} classes (limit {limit})")]
    TooManyClasses {
        line: usize,
        feature: String,
        count: usize,
        limit: usize,
    },

    #[error("Syntax Error in {section} line {line}: expected '<name> := <definition>', found '{text}'")]
    InvalidStatement {
        section: Section,
        line: usize,
        text: String,
    },

    #[error("Syntax Error in Conclusions line {line}: conclusion '{name}' has no class")]
    MissingConclusionClass { line: usize, name: String },

    #[error("Syntax Error in {section} line {line}: statement is {length} characters (limit {limit})")]
    StatementTooLong {
        section: Section,
        line: usize,
        length: usize,
        limit: usize,
    },

    #[error("Syntax Error in {section} line {}: {message}", .span.start.line)]
    InvalidExpression {
        section: Section,
        span: Span,
        message: String,
    },

    #[error("Syntax Error in {section} line {}: expression nests deeper than {limit} levels", .span.start.line)]
    ExpressionTooDeep {
        section: Section,
        span: Span,
        limit: usize,
    },
}

impl SyntaxError {
    pub fn invalid_feature_name(line: usize, name: &str) -> Self {
        Self::InvalidFeatureName {
            line,
            name: name.to_string(),
        }
    }

    pub fn invalid_class_line(line: usize, text: &str) -> Self {
        Self::InvalidClassLine {
            line,
            text: text.to_string(),
        }
    }

    pub fn invalid_class_definition(line: usize, class_name: &str, definition: &str) -> Self {
        Self::InvalidClassDefinition {
            line,
            class_name: class_name.to_string(),
            definition: definition.to_string(),
        }
    }

    pub fn invalid_statement(section: Section, line: usize, text: &str) -> Self {
        Self::InvalidStatement {
            section,
            line,
            text: text.to_string(),
        }
    }

    /// Attach section and position to an expression error.
    ///
    /// `definition_offset` is the byte offset of the expression inside
    /// `line_text`, so the span points at the offending character.
    pub fn from_expression(
        section: Section,
        line: usize,
        line_text: &str,
        definition_offset: usize,
        error: ExpressionError,
    ) -> Self {
        let span = match error.offset() {
            Some(offset) => Span::within_line(line, line_text, definition_offset + offset, 1),
            None => Span::line(line),
        };

        match error {
            ExpressionError::TooDeep { limit, .. } => Self::ExpressionTooDeep {
                section,
                span,
                limit,
            },
            other => Self::InvalidExpression {
                section,
                span,
                message: other.to_string(),
            },
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Self::InvalidFeatureName { .. }
            | Self::InvalidClassLine { .. }
            | Self::InvalidClassDefinition { .. }
            | Self::TooManyClasses { .. } => Section::Features,
            Self::MissingConclusionClass { .. } => Section::Conclusions,
            Self::InvalidStatement { section, .. }
            | Self::StatementTooLong { section, .. }
            | Self::InvalidExpression { section, .. }
            | Self::ExpressionTooDeep { section, .. } => *section,
        }
    }

    /// 1-based line within the section text
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidFeatureName { line, .. }
            | Self::InvalidClassLine { line, .. }
            | Self::InvalidClassDefinition { line, .. }
            | Self::TooManyClasses { line, .. }
            | Self::InvalidStatement { line, .. }
            | Self::MissingConclusionClass { line, .. }
            | Self::StatementTooLong { line, .. } => *line,
            Self::InvalidExpression { span, .. } | Self::ExpressionTooDeep { span, .. } => {
                span.start.line
            }
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::InvalidExpression { span, .. } | Self::ExpressionTooDeep { span, .. } => *span,
            _ => Span::line(self.line()),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidFeatureName { .. } => codes::features::INVALID_FEATURE_NAME,
            Self::InvalidClassLine { .. } => codes::features::INVALID_CLASS_LINE,
            Self::InvalidClassDefinition { .. } => codes::features::INVALID_CLASS_DEFINITION,
            Self::TooManyClasses { .. } => codes::features::TOO_MANY_CLASSES,
            Self::InvalidStatement { .. } => codes::statements::INVALID_STATEMENT,
            Self::MissingConclusionClass { .. } => codes::statements::MISSING_CONCLUSION_CLASS,
            Self::StatementTooLong { .. } => codes::statements::STATEMENT_TOO_LONG,
            Self::InvalidExpression { .. } => codes::expression::INVALID_EXPRESSION,
            Self::ExpressionTooDeep { .. } => codes::expression::EXPRESSION_TOO_DEEP,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_section_and_line() {
        let error = SyntaxError::invalid_statement(Section::Rules, 3, "R1 = Temp[Low]");
        assert!(error.to_string().starts_with("Syntax Error in Rules line 3:"));
        assert_eq!(error.section(), Section::Rules);
        assert_eq!(error.line(), 3);

        let error = SyntaxError::invalid_feature_name(5, "Temp!");
        assert!(error.to_string().starts_with("Syntax Error in Features line 5:"));
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            SyntaxError::invalid_class_line(2, "Low :: is 1").error_code().as_str(),
            "E102"
        );
        assert_eq!(
            SyntaxError::MissingConclusionClass {
                line: 1,
                name: "Fault".to_string()
            }
            .error_code()
            .as_str(),
            "E202"
        );
    }

    #[test]
    fn test_expression_error_points_at_column() {
        let line_text = "R1 := Temp[Low] + R2";
        let error = SyntaxError::from_expression(
            Section::Rules,
            4,
            line_text,
            6,
            ExpressionError::UnexpectedCharacter { ch: '+', offset: 10 },
        );

        assert_eq!(error.error_code(), codes::expression::INVALID_EXPRESSION);
        assert_eq!(error.line(), 4);
        assert_eq!(error.span().start.column, 17);
        assert!(error.to_string().starts_with("Syntax Error in Rules line 4:"));
    }

    #[test]
    fn test_depth_error_keeps_limit() {
        let error = SyntaxError::from_expression(
            Section::Conclusions,
            1,
            "F[on] := ((R1))",
            9,
            ExpressionError::TooDeep { limit: 1, offset: 1 },
        );
        assert!(matches!(error, SyntaxError::ExpressionTooDeep { limit: 1, .. }));
        assert_eq!(error.section(), Section::Conclusions);
    }

    #[test]
    fn test_syntax_errors_abort_the_document() {
        let error = SyntaxError::invalid_class_line(1, "x");
        assert!(error.requires_halt());
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "FeatureSyntax");
        assert_eq!(error.severity(), "High");
    }
}
