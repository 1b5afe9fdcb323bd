//! Logical-to-physical variable renaming across a whole document
//!
//! Keys are tried longest first at every position of a single left-to-right
//! scan, so a key that is a substring of a longer key never splits it, and
//! replaced text is never scanned again.

use indexmap::IndexMap;
use std::collections::HashMap;

use super::error::{DocumentError, DocumentResult};
use super::handler::Document;
use crate::logging::codes;
use crate::syntax::Section;
use crate::log_success;

/// Checked mapping, ordered longest key first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMapping {
    ordered: Vec<(String, String)>,
}

impl VariableMapping {
    /// Rejects empty keys and two keys sharing one target
    pub fn new<I, K, V>(mapping: I) -> DocumentResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ordered: Vec<(String, String)> = Vec::new();
        let mut targets: HashMap<String, String> = HashMap::new();

        for (key, value) in mapping {
            let key = key.into();
            let value = value.into();

            if key.is_empty() {
                return Err(DocumentError::invalid_mapping("mapping keys must not be empty"));
            }
            if let Some(previous) = targets.get(&value) {
                if previous != &key {
                    return Err(DocumentError::invalid_mapping(format!(
                        "'{}' and '{}' both map to '{}'",
                        previous, key, value
                    )));
                }
            }

            targets.insert(value.clone(), key.clone());
            match ordered.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => ordered.push((key, value)),
            }
        }

        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Ok(Self { ordered })
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Keys in the order they are tried
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|(key, _)| key.as_str())
    }

    pub fn apply(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            match self.ordered.iter().find(|(key, _)| rest.starts_with(key.as_str())) {
                Some((key, value)) => {
                    output.push_str(value);
                    rest = &rest[key.len()..];
                }
                None => {
                    output.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        output
    }
}

impl Document {
    /// New document with every mapped name replaced in every section's text
    pub fn remap_variables<I, K, V>(&self, mapping: I) -> DocumentResult<Document>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping = VariableMapping::new(mapping)?;
        self.remap_with(&mapping)
    }

    pub fn remap_with(&self, mapping: &VariableMapping) -> DocumentResult<Document> {
        let remapped: IndexMap<&str, String> = Section::ALL
            .into_iter()
            .map(|section| (section.as_str(), mapping.apply(self.section(section))))
            .collect();

        let document = self.parser().parse_sections(remapped)?;
        log_success!(
            codes::success::DOCUMENT_REMAPPED,
            "Document variables remapped",
            "keys" => mapping.len()
        );
        Ok(document)
    }
}
