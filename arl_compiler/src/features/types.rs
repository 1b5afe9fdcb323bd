//! Feature and membership class model

use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::literal::{parse_literal, Literal};

/// One end of an interval class
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// `min`: unbounded below
    Min,
    /// `max`: unbounded above
    Max,
    Value(Literal),
}

impl Bound {
    /// `min` and `max` are reserved, anything else is a literal
    pub fn parse(token: &str) -> Self {
        match token {
            "min" => Bound::Min,
            "max" => Bound::Max,
            other => Bound::Value(parse_literal(other)),
        }
    }

    /// Position on the real line, `None` for strings and unresolved names
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bound::Min => Some(f64::NEG_INFINITY),
            Bound::Max => Some(f64::INFINITY),
            Bound::Value(literal) => literal.as_f64(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Bound::Value(literal) if literal.is_numeric())
    }

    pub fn unresolved(&self) -> Option<&str> {
        match self {
            Bound::Value(Literal::Unresolved(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min => f.write_str("min"),
            Bound::Max => f.write_str("max"),
            Bound::Value(literal) => write!(f, "{}", literal),
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::Min => serializer.serialize_str("min"),
            Bound::Max => serializer.serialize_str("max"),
            Bound::Value(literal) => literal.serialize(serializer),
        }
    }
}

/// Right-hand side of `--> <class> :: <definition>`
#[derive(Debug, Clone, PartialEq)]
pub enum ClassDefinition {
    /// `is <value>`
    Point(Literal),
    /// `<min> to <max>`
    Interval { min: Bound, max: Bound },
}

impl ClassDefinition {
    /// A numeric point, or an interval with at least one numeric or
    /// unbounded end
    pub fn is_numeric(&self) -> bool {
        match self {
            ClassDefinition::Point(literal) => literal.is_numeric(),
            ClassDefinition::Interval { .. } => true,
        }
    }

    /// Unresolved symbolic names used by this definition
    pub fn unresolved(&self) -> Vec<&str> {
        match self {
            ClassDefinition::Point(Literal::Unresolved(name)) => vec![name.as_str()],
            ClassDefinition::Point(_) => Vec::new(),
            ClassDefinition::Interval { min, max } => {
                min.unresolved().into_iter().chain(max.unresolved()).collect()
            }
        }
    }
}

impl fmt::Display for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassDefinition::Point(value) => write!(f, "is {}", value),
            ClassDefinition::Interval { min, max } => write!(f, "{} to {}", min, max),
        }
    }
}

impl Serialize for ClassDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClassDefinition::Point(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("is", value)?;
                map.end()
            }
            ClassDefinition::Interval { min, max } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("min", min)?;
                map.serialize_entry("max", max)?;
                map.end()
            }
        }
    }
}

/// Class name to definition, in authoring order
pub type FeatureClasses = IndexMap<String, ClassDefinition>;

/// Parsed features section
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSet {
    pub features: IndexMap<String, FeatureClasses>,
    /// Unresolved symbolic values, in first-seen order
    pub undefined: IndexSet<String>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn has_class(&self, feature: &str, class_name: &str) -> bool {
        self.features
            .get(feature)
            .is_some_and(|classes| classes.contains_key(class_name))
    }

    pub fn classes(&self, feature: &str) -> Option<&FeatureClasses> {
        self.features.get(feature)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total number of classes across all features
    pub fn class_count(&self) -> usize {
        self.features.values().map(IndexMap::len).sum()
    }

    /// Add or replace a feature, recording its unresolved names
    pub fn insert(&mut self, name: String, classes: FeatureClasses) {
        for definition in classes.values() {
            for symbol in definition.unresolved() {
                if !self.undefined.contains(symbol) {
                    self.undefined.insert(symbol.to_string());
                }
            }
        }
        self.features.insert(name, classes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_classes() -> FeatureClasses {
        let mut classes = FeatureClasses::new();
        classes.insert(
            "Low".to_string(),
            ClassDefinition::Interval {
                min: Bound::Min,
                max: Bound::parse("50"),
            },
        );
        classes.insert(
            "Peak".to_string(),
            ClassDefinition::Point(parse_literal("p95")),
        );
        classes
    }

    #[test]
    fn test_bound_parse_reserved_words() {
        assert_eq!(Bound::parse("min"), Bound::Min);
        assert_eq!(Bound::parse("max"), Bound::Max);
        assert_eq!(Bound::parse("12"), Bound::Value(Literal::Integer(12)));
        assert_eq!(Bound::parse("MIN").unresolved(), Some("MIN"));
        assert_eq!(Bound::Min.as_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(Bound::parse("\"a\"").as_f64(), None);
    }

    #[test]
    fn test_class_definition_display() {
        let interval = ClassDefinition::Interval {
            min: Bound::parse("2.5"),
            max: Bound::Max,
        };
        assert_eq!(interval.to_string(), "2.5 to max");
        assert_eq!(
            ClassDefinition::Point(parse_literal("\"on\"")).to_string(),
            "is \"on\""
        );
    }

    #[test]
    fn test_numeric_detection() {
        assert!(ClassDefinition::Point(Literal::Float(1.0)).is_numeric());
        assert!(!ClassDefinition::Point(Literal::Str("on".to_string())).is_numeric());
        assert!(ClassDefinition::Interval {
            min: Bound::Min,
            max: Bound::parse("x")
        }
        .is_numeric());
    }

    #[test]
    fn test_insert_collects_undefined_once() {
        let mut set = FeatureSet::new();
        set.insert("Temp".to_string(), temp_classes());
        set.insert("Temp2".to_string(), temp_classes());

        assert_eq!(set.len(), 2);
        assert_eq!(set.class_count(), 4);
        assert!(set.has_class("Temp", "Peak"));
        assert!(!set.has_class("Temp", "High"));
        assert!(!set.has_class("Pressure", "Low"));
        assert_eq!(set.undefined.iter().collect::<Vec<_>>(), vec!["p95"]);
    }

    #[test]
    fn test_serialize_class_shapes() {
        let mut set = FeatureSet::new();
        set.insert("Temp".to_string(), temp_classes());

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "features": {"Temp": {"Low": {"min": "min", "max": 50}, "Peak": {"is": "p95"}}},
                "undefined": ["p95"]
            })
        );
    }
}
