//! Document sections and `[section]` header splitting

use serde::{Deserialize, Serialize};
use std::fmt;

use super::is_word_char;

/// The four named sections of an ARL document, in serialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Features,
    Rules,
    Conclusions,
    UndefinedVariables,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Features,
        Section::Rules,
        Section::Conclusions,
        Section::UndefinedVariables,
    ];

    /// Name used in the `[header]`
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Features => "features",
            Section::Rules => "rules",
            Section::Conclusions => "conclusions",
            Section::UndefinedVariables => "undefined_variables",
        }
    }

    /// Name used in diagnostics
    pub fn title(self) -> &'static str {
        match self {
            Section::Features => "Features",
            Section::Rules => "Rules",
            Section::Conclusions => "Conclusions",
            Section::UndefinedVariables => "Undefined Variables",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == name)
    }

    pub fn header(self) -> String {
        format!("[{}]", self.as_str())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A header and the trimmed text that follows it, up to the next header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

/// Split a document on `[name]` header lines.
///
/// A header starts at column 0, its name uses word characters, spaces and
/// hyphens, and only spaces may follow the closing bracket. Text before the
/// first header is discarded. Unknown header names are still returned so
/// callers can decide what to drop.
pub fn split_sections(text: &str) -> Vec<RawSection<'_>> {
    let mut sections = Vec::new();
    let mut current: Option<(&str, usize)> = None;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let line_end = line_start + line.len();

        if let Some(name) = parse_header(line) {
            if let Some((prev, content_start)) = current.take() {
                sections.push(RawSection {
                    name: prev,
                    content: text[content_start..line_start].trim(),
                });
            }
            current = Some((name, line_end));
        }

        line_start = line_end;
    }

    if let Some((name, content_start)) = current {
        sections.push(RawSection {
            name,
            content: text[content_start..].trim(),
        });
    }

    sections
}

fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let name = &rest[..close];
    let trailing = &rest[close + 1..];

    let valid_name =
        !name.is_empty() && name.chars().all(|c| is_word_char(c) || c == ' ' || c == '-');
    let valid_trailing = trailing
        .trim_end_matches(&['\n', '\r'][..])
        .chars()
        .all(|c| c == ' ');

    (valid_name && valid_trailing).then_some(name)
}
