//! Source location tracking
//!
//! Positions are relative to the text of a single document section: line 1 is
//! the first line after the `[section]` header.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in section text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from the start of the line (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span pointing at the start of a whole line
    pub fn line(line: usize) -> Self {
        let pos = Position::new(0, line, 1);
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span of `len` bytes starting at byte `offset` of `line_text`
    pub fn within_line(line: usize, line_text: &str, offset: usize, len: usize) -> Self {
        let column_at = |byte: usize| {
            let byte = byte.min(line_text.len());
            line_text
                .char_indices()
                .take_while(|(i, _)| *i < byte)
                .count()
                + 1
        };
        Self {
            start: Position::new(offset, line, column_at(offset)),
            end: Position::new(offset + len, line, column_at(offset + len)),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line lookup over a section's text for rendering diagnostics
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Get a line of text by line number (1-based)
    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        if line_num == 0 || line_num > self.line_starts.len() {
            return None;
        }

        let line_idx = line_num - 1;
        let start = self.line_starts[line_idx];
        let end = if line_idx + 1 < self.line_starts.len() {
            self.line_starts[line_idx + 1] - 1
        } else {
            self.source.len()
        };

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Format an error message with the offending line underlined
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("Error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let caret_len = if span.start.line == span.end.line && span.end.column > span.start.column
            {
                span.end.column - span.start.column
            } else {
                line.chars().count().saturating_sub(span.start.column - 1)
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(span.start.column.saturating_sub(1)),
                "^".repeat(caret_len.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_within_line_counts_chars() {
        let span = Span::within_line(3, "Températur[hot] & R1", 0, 11);
        assert_eq!(span.start.column, 1);
        assert_eq!(span.end.column, 11);
        assert_eq!(span.start.line, 3);
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new("R1 := A[x]\r\nR2 := R1\n".to_string());
        assert_eq!(map.get_line(1), Some("R1 := A[x]"));
        assert_eq!(map.get_line(2), Some("R2 := R1"));
        assert_eq!(map.get_line(3), Some(""));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(9), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("R1 := Temp[hot] &\n".to_string());
        let span = Span::within_line(1, "R1 := Temp[hot] &", 16, 1);
        let rendered = map.format_error(&span, "dangling operator");

        assert!(rendered.contains("Error: dangling operator"));
        assert!(rendered.contains("1 | R1 := Temp[hot] &"));
        assert!(rendered.contains("                 ^"));
    }

    #[test]
    fn test_whole_line_span() {
        let span = Span::line(7);
        assert_eq!(span.start().line, 7);
        assert_eq!(span.start().column, 1);
        assert_eq!(span.to_string(), "7:1-1");
    }
}
