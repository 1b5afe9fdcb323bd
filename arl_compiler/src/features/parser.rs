//! Features section parser
//!
//! ```text
//! Temp
//! --> Low :: min to 50
//! --> High :: 80 to max
//!
//! Mode
//! --> Auto :: is "auto"
//! ```
//!
//! Blocks are runs of non-blank lines; the first line names the feature and
//! every following line declares one class. Comment lines are dropped
//! without splitting a block.

use super::completion::{complete_classes, is_numeric_feature};
use super::types::{Bound, ClassDefinition, FeatureClasses, FeatureSet};
use crate::config::compile_time::parsing::MAX_FEATURE_CLASSES;
use crate::config::ParserPreferences;
use crate::literal::parse_literal;
use crate::logging::codes;
use crate::syntax::{is_class_char, is_comment, is_name_char, SyntaxError, SyntaxResult};
use crate::utils::Span;
use crate::{log_debug, log_success, log_warning};

const CLASS_PREFIX: &str = "-->";
const CLASS_SEPARATOR: &str = "::";
const INTERVAL_SEPARATOR: &str = " to ";

/// A trimmed line with its 1-based number in the section text
type Line<'a> = (usize, &'a str);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureParser {
    pub complete_ranges: bool,
    pub max_classes: usize,
}

impl FeatureParser {
    pub fn new() -> Self {
        Self {
            complete_ranges: true,
            max_classes: MAX_FEATURE_CLASSES,
        }
    }

    pub fn from_preferences(prefs: &ParserPreferences) -> Self {
        Self::new().with_range_completion(prefs.complete_ranges)
    }

    pub fn with_range_completion(mut self, enabled: bool) -> Self {
        self.complete_ranges = enabled;
        self
    }

    pub fn with_max_classes(mut self, limit: usize) -> Self {
        self.max_classes = limit;
        self
    }

    pub fn parse(&self, text: &str) -> SyntaxResult<FeatureSet> {
        let mut set = FeatureSet::new();

        for block in split_blocks(text) {
            let (name, classes) = self.parse_block(&block)?;
            set.insert(name, classes);
        }

        log_success!(
            codes::success::FEATURES_PARSED,
            "Features section parsed",
            "features" => set.len(),
            "classes" => set.class_count(),
            "undefined" => set.undefined.len()
        );

        Ok(set)
    }

    fn parse_block(&self, block: &[Line<'_>]) -> SyntaxResult<(String, FeatureClasses)> {
        let Some(&(name_line, name)) = block.first() else {
            return Ok((String::new(), FeatureClasses::new()));
        };

        if !name.chars().all(is_name_char) {
            return Err(SyntaxError::invalid_feature_name(name_line, name));
        }

        let class_lines = &block[1..];
        if class_lines.len() > self.max_classes {
            return Err(SyntaxError::TooManyClasses {
                line: name_line,
                feature: name.to_string(),
                count: class_lines.len(),
                limit: self.max_classes,
            });
        }

        let mut classes = FeatureClasses::with_capacity(class_lines.len());
        for &(line, text) in class_lines {
            let (class_name, definition) = parse_class_line(line, text)?;
            classes.insert(class_name, definition);
        }

        if self.complete_ranges && is_numeric_feature(&classes) {
            match complete_classes(&classes) {
                Some(completed) => {
                    if completed.len() > classes.len() {
                        log_debug!("Filled feature range gaps",
                            "feature" => name,
                            "added" => completed.len() - classes.len()
                        );
                    }
                    classes = completed;
                }
                None => {
                    log_warning!(
                        code = codes::warnings::RANGE_COMPLETION_SKIPPED,
                        "Feature ranges left as written: a bound is not a number",
                        span = Span::line(name_line),
                        "feature" => name
                    );
                }
            }
        }

        Ok((name.to_string(), classes))
    }
}

impl Default for FeatureParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a features section with default settings
pub fn parse_features(text: &str) -> SyntaxResult<FeatureSet> {
    FeatureParser::new().parse(text)
}

fn split_blocks(text: &str) -> Vec<Vec<Line<'_>>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        if is_comment(raw) {
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push((index + 1, line));
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// `--> <class> :: <definition>`
fn parse_class_line(line: usize, text: &str) -> SyntaxResult<(String, ClassDefinition)> {
    let invalid = || SyntaxError::invalid_class_line(line, text);

    let rest = text.strip_prefix(CLASS_PREFIX).ok_or_else(invalid)?;
    let (class_name, definition) = rest.split_once(CLASS_SEPARATOR).ok_or_else(invalid)?;
    let class_name = class_name.trim();
    let definition = definition.trim();

    if class_name.is_empty() || !class_name.chars().all(is_class_char) || definition.is_empty() {
        return Err(invalid());
    }

    let parsed = parse_definition(definition)
        .ok_or_else(|| SyntaxError::invalid_class_definition(line, class_name, definition))?;

    Ok((class_name.to_string(), parsed))
}

/// `<bound> to <bound>` or `is <value>`
fn parse_definition(definition: &str) -> Option<ClassDefinition> {
    if let Some(split) = definition.rfind(INTERVAL_SEPARATOR) {
        let min = definition[..split].trim();
        let max = definition[split + INTERVAL_SEPARATOR.len()..].trim();
        if min.is_empty() || max.is_empty() {
            return None;
        }
        return Some(ClassDefinition::Interval {
            min: Bound::parse(min),
            max: Bound::parse(max),
        });
    }

    let value = definition
        .strip_prefix("is")
        .filter(|rest| rest.starts_with(char::is_whitespace))?
        .trim();

    (!value.is_empty()).then(|| ClassDefinition::Point(parse_literal(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use assert_matches::assert_matches;

    fn names(set: &FeatureSet, feature: &str) -> Vec<String> {
        set.classes(feature).unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_worked_example_completes_to_three_classes() {
        let set = parse_features("Temp\n--> Low :: min to 50\n--> High :: 80 to max").unwrap();

        assert_eq!(names(&set, "Temp"), vec!["Low", "class 2", "High"]);
        assert_eq!(
            set.classes("Temp").unwrap()["class 2"],
            ClassDefinition::Interval {
                min: Bound::Value(Literal::Integer(50)),
                max: Bound::Value(Literal::Integer(80)),
            }
        );
    }

    #[test]
    fn test_multiple_blocks_and_comments() {
        let text = "% sensors\nTemp\n--> Low :: min to 50\n% --> Mid :: 50 to 80\n--> High :: 50 to max\n\n\nMode\n--> Auto :: is \"auto\"\n--> Manual :: is \"manual\"\n";
        let set = parse_features(text).unwrap();

        assert_eq!(set.feature_names().collect::<Vec<_>>(), vec!["Temp", "Mode"]);
        assert_eq!(names(&set, "Temp"), vec!["Low", "High"]);
        assert_eq!(
            set.classes("Mode").unwrap()["Auto"],
            ClassDefinition::Point(Literal::Str("auto".to_string()))
        );
    }

    #[test]
    fn test_comment_does_not_split_block() {
        let set = parse_features("Mode\n% note\n--> On :: is \"on\"").unwrap();
        assert_eq!(names(&set, "Mode"), vec!["On"]);
    }

    #[test]
    fn test_unresolved_values_are_collected() {
        let text = "Temp\n--> Low :: min to p05\n--> High :: p95 to max\n\nLevel\n--> Set :: is setpoint\n--> Alt :: is p05";
        let set = parse_features(text).unwrap();

        assert_eq!(
            set.undefined.iter().collect::<Vec<_>>(),
            vec!["p05", "p95", "setpoint"]
        );
        // no total order, left as written
        assert_eq!(names(&set, "Temp"), vec!["Low", "High"]);
    }

    #[test]
    fn test_reserved_bounds_are_not_undefined() {
        let set = parse_features("Temp\n--> All :: min to max").unwrap();
        assert!(set.undefined.is_empty());
        assert_eq!(names(&set, "Temp"), vec!["All"]);
    }

    #[test]
    fn test_completion_can_be_disabled() {
        let parser = FeatureParser::new().with_range_completion(false);
        let set = parser
            .parse("Temp\n--> Low :: min to 50\n--> High :: 80 to max")
            .unwrap();
        assert_eq!(names(&set, "Temp"), vec!["Low", "High"]);
    }

    #[test]
    fn test_invalid_feature_name_reports_section_line() {
        let text = "Temp\n--> Low :: min to 50\n\nBad:Name\n--> On :: is 1";
        let error = parse_features(text).unwrap_err();

        assert_matches!(error, SyntaxError::InvalidFeatureName { line: 4, ref name } if name == "Bad:Name");
        assert_eq!(error.to_string(), "Syntax Error in Features line 4: invalid feature name 'Bad:Name'");
    }

    #[test]
    fn test_invalid_class_line_counts_comments_and_blanks() {
        let text = "% header\n\nTemp\n--> Low :: min to 50\nHigh :: 80 to max";
        let error = parse_features(text).unwrap_err();
        assert_matches!(error, SyntaxError::InvalidClassLine { line: 5, .. });
    }

    #[test]
    fn test_invalid_class_definition_shapes() {
        for definition in ["between 1 and 2", "is", "island", " to 5"] {
            let text = format!("Temp\n--> Low :: {}", definition);
            let error = parse_features(&text).unwrap_err();
            assert!(
                matches!(
                    error,
                    SyntaxError::InvalidClassDefinition { line: 2, .. }
                        | SyntaxError::InvalidClassLine { line: 2, .. }
                ),
                "unexpected error for '{}': {:?}",
                definition,
                error
            );
        }
    }

    #[test]
    fn test_interval_splits_on_last_separator() {
        let set = parse_features("Mode\n--> Span :: \"up to\" to 5").unwrap();
        assert_eq!(
            set.classes("Mode").unwrap()["Span"],
            ClassDefinition::Interval {
                min: Bound::Value(Literal::Str("up to".to_string())),
                max: Bound::Value(Literal::Integer(5)),
            }
        );
    }

    #[test]
    fn test_invalid_class_name_characters() {
        let error = parse_features("Temp\n--> Lo.w :: is 1").unwrap_err();
        assert_matches!(error, SyntaxError::InvalidClassLine { line: 2, .. });
    }

    #[test]
    fn test_too_many_classes() {
        let parser = FeatureParser::new().with_max_classes(2);
        let error = parser
            .parse("Temp\n--> A :: is 1\n--> B :: is 2\n--> C :: is 3")
            .unwrap_err();
        assert_matches!(error, SyntaxError::TooManyClasses { line: 1, count: 3, limit: 2, .. });
    }

    #[test]
    fn test_duplicate_feature_replaces_in_place() {
        let text = "A\n--> X :: is \"x\"\n\nB\n--> Y :: is \"y\"\n\nA\n--> Z :: is \"z\"";
        let set = parse_features(text).unwrap();
        assert_eq!(set.feature_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(names(&set, "A"), vec!["Z"]);
    }

    #[test]
    fn test_empty_section() {
        let set = parse_features("").unwrap();
        assert!(set.is_empty());
        assert!(parse_features("\n\n% only comments\n").unwrap().is_empty());
    }
}
