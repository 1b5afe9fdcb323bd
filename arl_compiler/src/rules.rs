//! Rules section: named boolean or temporal expressions
//!
//! A rule may use feature classes and any rule defined on an earlier line.
//! Later or unknown names are recorded as missing rather than rejected.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ParserPreferences;
use crate::expression::ExpressionValidator;
use crate::features::FeatureSet;
use crate::logging::codes;
use crate::references::MissingReport;
use crate::statement::{parse_statement, resolve_definition, statement_lines, Definition};
use crate::syntax::{Section, SyntaxResult};
use crate::utils::Span;
use crate::{log_success, log_warning};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    pub rules: IndexMap<String, Definition>,
    pub missing: MissingReport,
}

impl RuleSet {
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleParser {
    pub validator: ExpressionValidator,
    pub warn_on_missing: bool,
}

impl RuleParser {
    pub fn new() -> Self {
        Self {
            validator: ExpressionValidator::new(),
            warn_on_missing: true,
        }
    }

    pub fn from_preferences(prefs: &ParserPreferences) -> Self {
        Self::new().with_missing_warnings(prefs.warn_on_missing_references)
    }

    pub fn with_missing_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_missing = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.validator = self.validator.with_max_depth(max_depth);
        self
    }

    pub fn parse(&self, text: &str, features: &FeatureSet) -> SyntaxResult<RuleSet> {
        let mut set = RuleSet::default();

        for (line, raw) in statement_lines(text) {
            let statement = parse_statement(Section::Rules, line, raw)?;

            if let Some(class) = statement.class {
                log_warning!(code = codes::warnings::RULE_CLASS_IGNORED, "Class on a rule line is ignored",
                    span = Span::line(line),
                    "rule" => statement.name,
                    "class" => class
                );
            }

            let definition = resolve_definition(
                Section::Rules,
                &statement,
                &self.validator,
                features,
                &set.rules,
                &mut set.missing,
                self.warn_on_missing,
            )?;

            set.rules.insert(statement.name.to_string(), definition);
        }

        log_success!(
            codes::success::RULES_PARSED,
            "Rules section parsed",
            "rules" => set.len(),
            "missing" => set.missing.total()
        );

        Ok(set)
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_rules(text: &str, features: &FeatureSet) -> SyntaxResult<RuleSet> {
    RuleParser::new().parse(text, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parse_features;
    use crate::references::{MissingClass, MissingFeature, MissingRule};
    use crate::syntax::SyntaxError;
    use assert_matches::assert_matches;

    fn features() -> FeatureSet {
        parse_features("Temp\n--> Low :: min to 50\n--> High :: 80 to max\n\nLoad\n--> High :: 0.8 to max")
            .unwrap()
    }

    #[test]
    fn test_rules_parse_with_corrected_definitions() {
        let text = "hot := Temp[High]\nbusy := Load[High] for >10 minutes\noverheat := hot & busy";
        let rules = parse_rules(text, &features()).unwrap();

        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["hot", "busy", "overheat"]);
        assert_eq!(rules.get("hot").unwrap().corrected_definition, "Temp[\"High\"]");
        assert_eq!(rules.get("overheat").unwrap().raw_definition, "hot & busy");
        assert!(rules.get("busy").unwrap().time_condition.is_some());
        assert!(rules.missing.is_empty());
    }

    #[test]
    fn test_missing_feature_is_not_fatal() {
        let rules = parse_rules("R1 := unknownFeature[hot]", &features()).unwrap();

        assert_eq!(
            rules.missing.features,
            vec![MissingFeature {
                feature: "unknownFeature".to_string(),
                line: 1
            }]
        );
        assert!(rules.contains("R1"));
    }

    #[test]
    fn test_forward_and_self_references_are_missing() {
        let text = "% comment\nR1 := R2 | R1\nR2 := Temp[Warm]";
        let rules = parse_rules(text, &features()).unwrap();

        assert_eq!(
            rules.missing.rules,
            vec![
                MissingRule { rule: "R2".to_string(), line: 2 },
                MissingRule { rule: "R1".to_string(), line: 2 },
            ]
        );
        assert_eq!(
            rules.missing.classes,
            vec![MissingClass {
                feature: "Temp".to_string(),
                class_name: "Warm".to_string(),
                line: 3
            }]
        );
    }

    #[test]
    fn test_class_on_rule_is_ignored() {
        let rules = parse_rules("R1[on] := Temp[Low]", &features()).unwrap();
        assert!(rules.contains("R1"));
    }

    #[test]
    fn test_redefinition_replaces() {
        let rules = parse_rules("R1 := Temp[Low]\nR2 := R1\nR1 := Temp[High]", &features()).unwrap();
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["R1", "R2"]);
        assert_eq!(rules.get("R1").unwrap().raw_definition, "Temp[High]");
    }

    #[test]
    fn test_syntax_errors_carry_line() {
        let error = parse_rules("R1 := Temp[Low]\n\nR2 := (R1", &features()).unwrap_err();
        assert_matches!(error, SyntaxError::InvalidExpression { section: Section::Rules, .. });
        assert_eq!(error.line(), 3);
        assert!(error.to_string().starts_with("Syntax Error in Rules line 3:"));
    }

    #[test]
    fn test_depth_limit_applies() {
        let error = RuleParser::new()
            .with_max_depth(1)
            .parse("R1 := ((Temp[Low]))", &features())
            .unwrap_err();
        assert_matches!(error, SyntaxError::ExpressionTooDeep { .. });
    }

    #[test]
    fn test_empty_section() {
        let rules = parse_rules("", &features()).unwrap();
        assert!(rules.is_empty());
        assert!(rules.missing.is_empty());
    }
}
