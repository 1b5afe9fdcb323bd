//! Missing-reference diagnostics
//!
//! Unresolved names never abort a parse. They are listed here with the line
//! that used them so authors can see what is not yet defined.

use serde::Serialize;

use crate::expression::Validation;
use crate::logging::codes;
use crate::syntax::Section;
use crate::utils::Span;
use crate::log_warning;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFeature {
    pub feature: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingClass {
    pub feature: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingRule {
    pub rule: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub features: Vec<MissingFeature>,
    pub classes: Vec<MissingClass>,
    pub rules: Vec<MissingRule>,
}

impl MissingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.classes.is_empty() && self.rules.is_empty()
    }

    pub fn total(&self) -> usize {
        self.features.len() + self.classes.len() + self.rules.len()
    }

    /// Add the misses of one validated statement, optionally logging each
    pub fn record(&mut self, section: Section, line: usize, validation: &Validation, warn: bool) {
        let span = Span::line(line);

        for feature in &validation.missing_features {
            if warn {
                log_warning!(code = codes::warnings::MISSING_FEATURE, "Reference to undefined feature",
                    span = span,
                    "section" => section,
                    "feature" => feature
                );
            }
            self.features.push(MissingFeature {
                feature: feature.clone(),
                line,
            });
        }

        for (feature, class_name) in &validation.missing_classes {
            if warn {
                log_warning!(code = codes::warnings::MISSING_CLASS, "Reference to undefined class",
                    span = span,
                    "section" => section,
                    "feature" => feature,
                    "class" => class_name
                );
            }
            self.classes.push(MissingClass {
                feature: feature.clone(),
                class_name: class_name.clone(),
                line,
            });
        }

        for rule in &validation.missing_aliases {
            if warn {
                log_warning!(code = codes::warnings::MISSING_RULE, "Reference to undefined rule",
                    span = span,
                    "section" => section,
                    "rule" => rule
                );
            }
            self.rules.push(MissingRule {
                rule: rule.clone(),
                line,
            });
        }
    }

    /// One line per miss, ordered by line, for terminal output
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<(usize, String)> = Vec::with_capacity(self.total());

        for m in &self.features {
            lines.push((m.line, format!("line {}: undefined feature '{}'", m.line, m.feature)));
        }
        for m in &self.classes {
            lines.push((
                m.line,
                format!(
                    "line {}: feature '{}' has no class '{}'",
                    m.line, m.feature, m.class_name
                ),
            ));
        }
        for m in &self.rules {
            lines.push((m.line, format!("line {}: undefined rule '{}'", m.line, m.rule)));
        }

        lines.sort_by_key(|(line, _)| *line);
        lines.into_iter().map(|(_, text)| text).collect()
    }
}
