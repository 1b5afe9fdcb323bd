//! Render a feature set back to section text

use super::types::FeatureSet;

impl FeatureSet {
    /// One block per feature, separated by a blank line. Strings are
    /// quoted, unresolved names stay bare, so the text parses back to the
    /// same set.
    pub fn to_text(&self) -> String {
        let blocks: Vec<String> = self
            .features
            .iter()
            .map(|(name, classes)| {
                let mut block = format!("{}\n", name.trim());
                for (class_name, definition) in classes {
                    block.push_str(&format!("--> {} :: {}\n", class_name, definition));
                }
                block
            })
            .collect();

        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::features::parse_features;

    #[test]
    fn test_to_text_renders_completed_classes() {
        let set = parse_features("Temp\n--> Low :: min to 50\n--> High :: 80.0 to max").unwrap();
        assert_eq!(
            set.to_text(),
            "Temp\n--> Low :: min to 50\n--> class 2 :: 50 to 80.0\n--> High :: 80.0 to max\n"
        );
    }

    #[test]
    fn test_to_text_round_trips() {
        let text = "Mode\n--> Auto :: is \"auto\"\n--> Ref :: is setpoint\n\nLevel\n--> Low :: min to -1.5\n";
        let set = parse_features(text).unwrap();
        let rendered = set.to_text();

        assert_eq!(parse_features(&rendered).unwrap(), set);
        assert!(rendered.starts_with("Mode\n--> Auto :: is \"auto\"\n--> Ref :: is setpoint\n\nLevel\n"));
    }

    #[test]
    fn test_empty_set_renders_empty() {
        assert_eq!(parse_features("").unwrap().to_text(), "");
    }
}
