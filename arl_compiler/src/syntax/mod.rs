//! Section splitting, shared character classes and fatal syntax errors

mod error;
mod section;

pub use error::{SyntaxError, SyntaxResult};
pub use section::{split_sections, RawSection, Section};

/// `\w`: letters, digits and underscore, Unicode aware
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters allowed in feature, rule and conclusion names
pub(crate) fn is_name_char(c: char) -> bool {
    is_word_char(c) || matches!(c, ' ' | '.' | '-')
}

/// Characters allowed in class names
pub(crate) fn is_class_char(c: char) -> bool {
    is_word_char(c) || matches!(c, ' ' | '-')
}

/// Comment lines start with `%` after leading whitespace
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_classes() {
        assert!("Temp 1.5-b_x".chars().all(is_name_char));
        assert!(!"Temp[Low]".chars().all(is_name_char));
        assert!("very high".chars().all(is_class_char));
        assert!(!"v1.5".chars().all(is_class_char));
        assert!("Température".chars().all(is_word_char));
    }

    #[test]
    fn test_comment_detection() {
        assert!(is_comment("% note"));
        assert!(is_comment("   %indented"));
        assert!(!is_comment("R1 := A % B"));
    }
}
