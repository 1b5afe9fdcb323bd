//! Reference resolution and correction for rule and conclusion definitions

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

use super::error::ExpressionError;
use super::grammar::check_structure;
use super::lexer::tokenize;
use super::token::Token;
use crate::config::compile_time::parsing::MAX_EXPRESSION_DEPTH;
use crate::features::FeatureSet;

/// Names that bare references may resolve to
pub trait AliasLookup {
    fn contains_alias(&self, name: &str) -> bool;
}

impl AliasLookup for HashSet<String> {
    fn contains_alias(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl AliasLookup for IndexSet<String> {
    fn contains_alias(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<V> AliasLookup for IndexMap<String, V> {
    fn contains_alias(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<T: AliasLookup + ?Sized> AliasLookup for &T {
    fn contains_alias(&self, name: &str) -> bool {
        (**self).contains_alias(name)
    }
}

/// Outcome of validating one definition. Missing references are listed
/// once per occurrence, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Definition with every `name[class]` rewritten as `name["class"]`
    pub corrected: String,
    pub missing_features: Vec<String>,
    /// `(feature, class)` pairs where the feature exists but the class does not
    pub missing_classes: Vec<(String, String)>,
    pub missing_aliases: Vec<String>,
}

impl Validation {
    pub fn has_missing(&self) -> bool {
        !self.missing_features.is_empty()
            || !self.missing_classes.is_empty()
            || !self.missing_aliases.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionValidator {
    pub max_depth: usize,
}

impl ExpressionValidator {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_EXPRESSION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate<A: AliasLookup + ?Sized>(
        &self,
        expr: &str,
        features: &FeatureSet,
        aliases: &A,
    ) -> Result<Validation, ExpressionError> {
        let tokens = tokenize(expr)?;
        check_structure(&tokens, self.max_depth)?;

        let mut validation = Validation::default();
        let mut corrected = String::with_capacity(expr.len() + 8);
        let mut cursor = 0;

        for positioned in &tokens {
            let Token::Reference { name, class } = &positioned.token else {
                continue;
            };

            match class {
                Some(class) => {
                    if !features.has_feature(name) {
                        validation.missing_features.push(name.clone());
                    } else if !features.has_class(name, class) {
                        validation
                            .missing_classes
                            .push((name.clone(), class.clone()));
                    }

                    corrected.push_str(&expr[cursor..positioned.offset]);
                    corrected.push_str(&format!("{}[\"{}\"]", name, class));
                    cursor = positioned.end();
                }
                None => {
                    if !aliases.contains_alias(name) {
                        validation.missing_aliases.push(name.clone());
                    }
                }
            }
        }

        corrected.push_str(&expr[cursor..]);
        validation.corrected = corrected;
        Ok(validation)
    }
}

impl Default for ExpressionValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the configured nesting limit
pub fn validate_expression<A: AliasLookup + ?Sized>(
    expr: &str,
    features: &FeatureSet,
    aliases: &A,
) -> Result<Validation, ExpressionError> {
    ExpressionValidator::new().validate(expr, features, aliases)
}
