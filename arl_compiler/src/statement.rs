//! Line grammar shared by the rules and conclusions sections
//!
//! ```text
//! <name>[<class>]? := <definition>( for <sign><number> <unit>)?
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::config::compile_time::parsing::MAX_STATEMENT_LENGTH;
use crate::expression::{AliasLookup, ExpressionValidator};
use crate::features::FeatureSet;
use crate::references::MissingReport;
use crate::syntax::{is_class_char, is_comment, is_name_char, Section, SyntaxError, SyntaxResult};

const ASSIGN: &str = " := ";
const TIME_MARKER: &str = " for ";

/// Temporal qualifier such as `for >5 minutes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeCondition {
    pub sign: char,
    /// Numeric text as written
    pub value: String,
    pub unit: String,
}

impl fmt::Display for TimeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for {}{} {}", self.sign, self.value, self.unit)
    }
}

/// A validated definition as stored under a rule or conclusion class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub raw_definition: String,
    pub corrected_definition: String,
    #[serde(serialize_with = "serialize_time_condition")]
    pub time_condition: Option<TimeCondition>,
}

/// Always `{sign, value, unit}`, with nulls when there is no condition
fn serialize_time_condition<S: Serializer>(
    condition: &Option<TimeCondition>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(3))?;
    map.serialize_entry("sign", &condition.as_ref().map(|c| c.sign))?;
    map.serialize_entry("value", &condition.as_ref().map(|c| c.value.as_str()))?;
    map.serialize_entry("unit", &condition.as_ref().map(|c| c.unit.as_str()))?;
    map.end()
}

/// One parsed statement line, borrowing from the section text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    pub line: usize,
    pub raw: &'a str,
    pub name: &'a str,
    pub class: Option<&'a str>,
    pub definition: &'a str,
    /// Byte offset of `definition` within `raw`
    pub definition_offset: usize,
    pub time_condition: Option<TimeCondition>,
}

/// Non-blank, non-comment lines with their 1-based numbers
pub fn statement_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !is_comment(line))
        .map(|(index, line)| (index + 1, line))
}

pub fn parse_statement<'a>(section: Section, line: usize, raw: &'a str) -> SyntaxResult<Statement<'a>> {
    let length = raw.trim().chars().count();
    if length > MAX_STATEMENT_LENGTH {
        return Err(SyntaxError::StatementTooLong {
            section,
            line,
            length,
            limit: MAX_STATEMENT_LENGTH,
        });
    }

    let invalid = || SyntaxError::invalid_statement(section, line, raw.trim());

    let (head, tail) = raw.split_once(ASSIGN).ok_or_else(invalid)?;
    let (name, class) = parse_head(head).ok_or_else(invalid)?;

    let (body, time_condition) = match tail.rfind(TIME_MARKER) {
        Some(split) => match parse_time_condition(&tail[split + TIME_MARKER.len()..]) {
            Some(condition) => (&tail[..split], Some(condition)),
            None => (tail, None),
        },
        None => (tail, None),
    };

    let definition = body.trim();
    if definition.is_empty() || !definition.chars().all(is_definition_char) {
        return Err(invalid());
    }

    let tail_offset = head.len() + ASSIGN.len();
    let definition_offset = tail_offset + (body.len() - body.trim_start().len());

    Ok(Statement {
        line,
        raw,
        name,
        class,
        definition,
        definition_offset,
        time_condition,
    })
}

/// `name` or `name[class]`, both trimmed and non-empty
fn parse_head(head: &str) -> Option<(&str, Option<&str>)> {
    let head = head.trim();

    let (name, class) = match head.strip_suffix(']') {
        Some(open_part) => {
            let open = open_part.find('[')?;
            let class = open_part[open + 1..].trim();
            if class.is_empty() || !class.chars().all(is_class_char) {
                return None;
            }
            (open_part[..open].trim(), Some(class))
        }
        None => (head, None),
    };

    (!name.is_empty() && name.chars().all(is_name_char)).then_some((name, class))
}

/// `<sign><number> <unit>` with sign one of `>`, `<`, `=`
fn parse_time_condition(text: &str) -> Option<TimeCondition> {
    let mut chars = text.chars();
    let sign = chars.next().filter(|c| matches!(c, '>' | '<' | '='))?;
    let (value, unit) = chars.as_str().split_once(' ')?;

    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let numeric = !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    let valid_unit = !unit.is_empty() && unit.chars().all(crate::syntax::is_word_char);

    (numeric && valid_unit).then(|| TimeCondition {
        sign,
        value: value.to_string(),
        unit: unit.to_string(),
    })
}

fn is_definition_char(c: char) -> bool {
    is_name_char(c) || matches!(c, '&' | '|' | '(' | ')' | '[' | ']')
}

/// Validate a statement's definition and record its missing references
pub(crate) fn resolve_definition<A: AliasLookup + ?Sized>(
    section: Section,
    statement: &Statement<'_>,
    validator: &ExpressionValidator,
    features: &FeatureSet,
    aliases: &A,
    missing: &mut MissingReport,
    warn_on_missing: bool,
) -> SyntaxResult<Definition> {
    let validation = validator
        .validate(statement.definition, features, aliases)
        .map_err(|error| {
            SyntaxError::from_expression(
                section,
                statement.line,
                statement.raw,
                statement.definition_offset,
                error,
            )
        })?;

    missing.record(section, statement.line, &validation, warn_on_missing);

    Ok(Definition {
        raw_definition: statement.definition.to_string(),
        corrected_definition: validation.corrected,
        time_condition: statement.time_condition.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rule_statement() {
        let statement = parse_statement(Section::Rules, 1, "overheat := Temp[High] & Load[High]").unwrap();
        assert_eq!(statement.name, "overheat");
        assert_eq!(statement.class, None);
        assert_eq!(statement.definition, "Temp[High] & Load[High]");
        assert_eq!(statement.definition_offset, 12);
        assert_eq!(statement.time_condition, None);
    }

    #[test]
    fn test_conclusion_with_class_and_time() {
        let statement =
            parse_statement(Section::Conclusions, 2, "  Pump Fault[on] := overheat for >5 minutes").unwrap();
        assert_eq!(statement.name, "Pump Fault");
        assert_eq!(statement.class, Some("on"));
        assert_eq!(statement.definition, "overheat");
        assert_eq!(
            statement.time_condition,
            Some(TimeCondition {
                sign: '>',
                value: "5".to_string(),
                unit: "minutes".to_string()
            })
        );
        assert_eq!(&statement.raw[statement.definition_offset..][..8], "overheat");
    }

    #[test]
    fn test_decimal_time_value_kept_as_written() {
        let statement = parse_statement(Section::Rules, 1, "R1 := A for =2.50 s").unwrap();
        let condition = statement.time_condition.unwrap();
        assert_eq!(condition.value, "2.50");
        assert_eq!(condition.to_string(), "for =2.50 s");
    }

    #[test]
    fn test_unparsed_time_suffix_stays_in_definition() {
        let statement = parse_statement(Section::Rules, 1, "R1 := wait for it").unwrap();
        assert_eq!(statement.definition, "wait for it");
        assert_eq!(statement.time_condition, None);
    }

    #[test]
    fn test_malformed_statements() {
        for line in [
            "R1 = A",
            "R1 :=A",
            " := A",
            "R1[] := A",
            "R1[on := A",
            "R:1 := A",
            "R1 := ",
            "R1 := A + B",
            "R1 := \"quoted\"",
        ] {
            assert_matches!(
                parse_statement(Section::Rules, 7, line),
                Err(SyntaxError::InvalidStatement { line: 7, section: Section::Rules, .. }),
                "accepted '{}'",
                line
            );
        }
    }

    #[test]
    fn test_statement_too_long() {
        let line = format!("R1 := {}", "A".repeat(MAX_STATEMENT_LENGTH));
        assert_matches!(
            parse_statement(Section::Rules, 1, &line),
            Err(SyntaxError::StatementTooLong { line: 1, .. })
        );
    }

    #[test]
    fn test_statement_lines_skip_comments_and_blanks() {
        let lines: Vec<_> = statement_lines("R1 := A\n% R2 := B\n\n  R3 := C").collect();
        assert_eq!(lines, vec![(1, "R1 := A"), (4, "  R3 := C")]);
    }

    #[test]
    fn test_time_condition_serializes_nulls() {
        let definition = Definition {
            raw_definition: "A".to_string(),
            corrected_definition: "A".to_string(),
            time_condition: None,
        };
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(
            json["time_condition"],
            serde_json::json!({"sign": null, "value": null, "unit": null})
        );
    }
}
