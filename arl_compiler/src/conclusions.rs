//! Conclusions section: per-class definitions of top-level outcomes
//!
//! Conclusion names are stored in canonical form, spaces replaced by
//! underscores. `renames` maps each canonical name back to the name as
//! written whenever the two differ.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ParserPreferences;
use crate::expression::ExpressionValidator;
use crate::features::FeatureSet;
use crate::logging::codes;
use crate::references::MissingReport;
use crate::rules::RuleSet;
use crate::statement::{parse_statement, resolve_definition, statement_lines, Definition};
use crate::syntax::{Section, SyntaxError, SyntaxResult};
use crate::utils::Span;
use crate::{log_success, log_warning};

/// Class name to definition
pub type ConclusionClasses = IndexMap<String, Definition>;

pub fn canonical_name(name: &str) -> String {
    name.replace(' ', "_")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConclusionSet {
    pub conclusions: IndexMap<String, ConclusionClasses>,
    pub missing: MissingReport,
    pub renames: IndexMap<String, String>,
}

impl ConclusionSet {
    /// Look up by canonical or written name
    pub fn get(&self, name: &str) -> Option<&ConclusionClasses> {
        self.conclusions
            .get(name)
            .or_else(|| self.conclusions.get(&canonical_name(name)))
    }

    /// Name as the author wrote it
    pub fn display_name<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.renames
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conclusions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.conclusions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conclusions.is_empty()
    }

    pub fn class_count(&self) -> usize {
        self.conclusions.values().map(IndexMap::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConclusionParser {
    pub validator: ExpressionValidator,
    pub warn_on_missing: bool,
}

impl ConclusionParser {
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

    pub fn parse(
        &self,
        text: &str,
        features: &FeatureSet,
        rules: &RuleSet,
    ) -> SyntaxResult<ConclusionSet> {
        let mut set = ConclusionSet::default();
        // canonical name -> first name written for it
        let mut written: IndexMap<String, String> = IndexMap::new();

        for (line, raw) in statement_lines(text) {
            let statement = parse_statement(Section::Conclusions, line, raw)?;
            let class = statement
                .class
                .ok_or_else(|| SyntaxError::MissingConclusionClass {
                    line,
                    name: statement.name.to_string(),
                })?;

            let definition = resolve_definition(
                Section::Conclusions,
                &statement,
                &self.validator,
                features,
                &rules.rules,
                &mut set.missing,
                self.warn_on_missing,
            )?;

            let canonical = canonical_name(statement.name);
            match written.get(&canonical) {
                Some(first) if first != statement.name => {
                    log_warning!(code = codes::warnings::CONCLUSION_NAMES_MERGED,
                        "Conclusion names differ only by spaces and are merged",
                        span = Span::line(line),
                        "name" => statement.name,
                        "merged_into" => canonical
                    );
                }
                Some(_) => {}
                None => {
                    written.insert(canonical.clone(), statement.name.to_string());
                }
            }
            if canonical != statement.name && !set.renames.contains_key(&canonical) {
                set.renames
                    .insert(canonical.clone(), statement.name.to_string());
            }

            set.conclusions
                .entry(canonical)
                .or_default()
                .insert(class.to_string(), definition);
        }

        log_success!(
            codes::success::CONCLUSIONS_PARSED,
            "Conclusions section parsed",
            "conclusions" => set.len(),
            "classes" => set.class_count(),
            "missing" => set.missing.total()
        );

        Ok(set)
    }
}

impl Default for ConclusionParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_conclusions(
    text: &str,
    features: &FeatureSet,
    rules: &RuleSet,
) -> SyntaxResult<ConclusionSet> {
    ConclusionParser::new().parse(text, features, rules)
}
