//! The document: four section texts and the structures parsed from them
//!
//! A document is immutable. Every operation that changes text returns a new
//! document parsed from scratch, so the parsed structures always describe
//! the current text.

use indexmap::IndexMap;
use std::time::Instant;

use super::error::{DocumentError, DocumentResult};
use crate::conclusions::{canonical_name, ConclusionParser, ConclusionSet};
use crate::config::ParserPreferences;
use crate::features::{FeatureParser, FeatureSet};
use crate::logging::codes;
use crate::rules::{RuleParser, RuleSet};
use crate::statement::{parse_statement, statement_lines};
use crate::syntax::{split_sections, Section};
use crate::{log_debug, log_error, log_performance, log_success};

/// Parser settings shared by a document and everything derived from it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentParser {
    pub features: FeatureParser,
    pub rules: RuleParser,
    pub conclusions: ConclusionParser,
}

impl DocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(prefs: &ParserPreferences) -> Self {
        Self {
            features: FeatureParser::from_preferences(prefs),
            rules: RuleParser::from_preferences(prefs),
            conclusions: ConclusionParser::from_preferences(prefs),
        }
    }

    /// Parse a full `[section]` document
    pub fn parse(&self, text: &str) -> DocumentResult<Document> {
        let mut texts = IndexMap::new();
        for raw in split_sections(text) {
            match Section::from_name(raw.name) {
                Some(section) => {
                    texts.insert(section, raw.content.to_string());
                }
                None => {
                    log_debug!("Dropping unknown document section", "section" => raw.name);
                }
            }
        }
        self.build(texts)
    }

    /// Parse from section name / text pairs; unknown names are dropped
    pub fn parse_sections<I, K, V>(&self, sections: I) -> DocumentResult<Document>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut texts = IndexMap::new();
        for (name, content) in sections {
            match Section::from_name(name.as_ref()) {
                Some(section) => {
                    texts.insert(section, content.as_ref().trim().to_string());
                }
                None => {
                    log_debug!("Dropping unknown document section", "section" => name.as_ref());
                }
            }
        }
        self.build(texts)
    }

    fn build(&self, mut texts: IndexMap<Section, String>) -> DocumentResult<Document> {
        let started = Instant::now();

        let mut ordered = IndexMap::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            ordered.insert(section, texts.swap_remove(&section).unwrap_or_default());
        }

        let parsed = self.parse_parts(&ordered);
        let (features, rules, conclusions) = match parsed {
            Ok(parts) => parts,
            Err(error) => {
                if let Some(syntax) = error.as_syntax() {
                    log_error!(syntax.error_code(), "Document section failed to parse",
                        span = syntax.span(),
                        "section" => syntax.section(),
                        "error" => syntax
                    );
                }
                return Err(error);
            }
        };

        log_performance!(
            codes::success::DOCUMENT_PARSED,
            "Document parsed",
            duration = started.elapsed(),
            "features" => features.len(),
            "rules" => rules.len(),
            "conclusions" => conclusions.len()
        );

        Ok(Document {
            texts: ordered,
            features,
            rules,
            conclusions,
            parser: self.clone(),
        })
    }

    fn parse_parts(
        &self,
        texts: &IndexMap<Section, String>,
    ) -> DocumentResult<(FeatureSet, RuleSet, ConclusionSet)> {
        let text = |section: Section| texts.get(&section).map(String::as_str).unwrap_or("");

        let features = self.features.parse(text(Section::Features))?;
        let rules = self.rules.parse(text(Section::Rules), &features)?;
        let conclusions = self
            .conclusions
            .parse(text(Section::Conclusions), &features, &rules)?;

        Ok((features, rules, conclusions))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    texts: IndexMap<Section, String>,
    features: FeatureSet,
    rules: RuleSet,
    conclusions: ConclusionSet,
    parser: DocumentParser,
}

impl Document {
    pub fn from_text(text: &str) -> DocumentResult<Self> {
        DocumentParser::new().parse(text)
    }

    pub fn from_sections<I, K, V>(sections: I) -> DocumentResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        DocumentParser::new().parse_sections(sections)
    }

    /// Four empty sections
    pub fn empty() -> DocumentResult<Self> {
        Self::from_text("")
    }

    pub fn section(&self, section: Section) -> &str {
        self.texts.get(&section).map(String::as_str).unwrap_or("")
    }

    /// Section texts keyed by header name, in serialization order
    pub fn sections(&self) -> IndexMap<&'static str, &str> {
        Section::ALL
            .into_iter()
            .map(|section| (section.as_str(), self.section(section)))
            .collect()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn conclusions(&self) -> &ConclusionSet {
        &self.conclusions
    }

    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }

    /// `[section]\n<text>` blocks in fixed order, separated by a blank line
    pub fn to_text(&self) -> String {
        Section::ALL
            .into_iter()
            .map(|section| format!("[{}]\n{}", section.as_str(), self.section(section)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// New document with one section replaced and everything re-parsed
    pub fn set_section(&self, section: Section, text: &str) -> DocumentResult<Self> {
        let mut texts = self.texts.clone();
        texts.insert(section, text.trim().to_string());
        self.parser.build(texts)
    }

    /// New document whose conclusions section keeps only the lines defining
    /// `name`, matched as written or in canonical form
    pub fn slice_to_conclusion(&self, name: &str) -> DocumentResult<Self> {
        let wanted = canonical_name(name);
        let text = self.section(Section::Conclusions);

        let kept: Vec<&str> = statement_lines(text)
            .filter(|(line, raw)| {
                parse_statement(Section::Conclusions, *line, raw)
                    .map(|statement| {
                        statement.name == name || canonical_name(statement.name) == wanted
                    })
                    .unwrap_or(false)
            })
            .map(|(_, raw)| raw)
            .collect();

        if kept.is_empty() {
            log_error!(codes::document::CONCLUSION_NOT_FOUND, "Conclusion not found",
                "conclusion" => name
            );
            return Err(DocumentError::conclusion_not_found(name));
        }

        let sliced = self.set_section(Section::Conclusions, &kept.join("\n"))?;
        log_success!(
            codes::success::DOCUMENT_SLICED,
            "Document sliced to one conclusion",
            "conclusion" => name,
            "lines" => kept.len()
        );
        Ok(sliced)
    }

    /// New document whose features section is the serialized, range
    /// completed feature set
    pub fn with_completed_features(&self) -> DocumentResult<Self> {
        let completing = self.parser.features.clone().with_range_completion(true);
        let features = completing.parse(self.section(Section::Features))?;
        self.set_section(Section::Features, &features.to_text())
    }

    /// Canonical conclusion names in definition order
    pub fn conclusion_names(&self) -> Vec<&str> {
        self.conclusions.names().collect()
    }

    /// Every canonical conclusion name mapped to an unassigned target
    pub fn base_conclusion_mapping(&self) -> IndexMap<String, Option<String>> {
        self.conclusions
            .names()
            .map(|name| (name.to_string(), None))
            .collect()
    }
}
