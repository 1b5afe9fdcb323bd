use crate::document::{Document, Interchange, MissingCounts};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON written by `arl json`
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub missing: MissingCounts,
    pub document: Interchange,
}

impl PipelineOutput {
    pub fn new(source: impl Into<String>, document: &Document) -> Self {
        let document = document.to_interchange();
        Self {
            source: source.into(),
            generated_at: Utc::now(),
            missing: document.missing_counts(),
            document,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let document = Document::from_text(
            "[features]\nA\n--> x :: is 1\n\n[rules]\nR1 := A[x] & B\n",
        )
        .unwrap();

        let output = PipelineOutput::new("plant.arl", &document);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["source"], "plant.arl");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["missing"]["features"], 1);
        assert_eq!(value["missing"]["classes"], 0);
        assert!(value["document"]["rules"]["rules"]["R1"].is_object());
    }
}
