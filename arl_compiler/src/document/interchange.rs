//! Structured JSON form exchanged with the knowledge service

use serde::Serialize;

use super::error::DocumentResult;
use super::handler::Document;
use crate::conclusions::ConclusionSet;
use crate::features::FeatureSet;
use crate::rules::RuleSet;

/// `{"features": {...}, "rules": {...}, "conclusions": {...}}`, keys in
/// first-definition order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interchange {
    pub features: FeatureSet,
    pub rules: RuleSet,
    pub conclusions: ConclusionSet,
}

/// Missing-reference totals per section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingCounts {
    pub features: usize,
    pub classes: usize,
    pub rules: usize,
}

impl MissingCounts {
    pub fn total(&self) -> usize {
        self.features + self.classes + self.rules
    }
}

impl Interchange {
    /// Combined over rules and conclusions
    pub fn missing_counts(&self) -> MissingCounts {
        let rules = &self.rules.missing;
        let conclusions = &self.conclusions.missing;
        MissingCounts {
            features: rules.features.len() + conclusions.features.len(),
            classes: rules.classes.len() + conclusions.classes.len(),
            rules: rules.rules.len() + conclusions.rules.len(),
        }
    }
}

impl Document {
    pub fn to_interchange(&self) -> Interchange {
        Interchange {
            features: self.features().clone(),
            rules: self.rules().clone(),
            conclusions: self.conclusions().clone(),
        }
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string(&self.to_interchange())?)
    }

    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_interchange())?)
    }
}
