//! Range completion for numeric features
//!
//! The classes of a numeric feature are widened into a tiling of the real
//! line: sorted by lower bound, gaps filled with synthesized `class <n>`
//! intervals, open ends closed with `min`/`max`.

use std::collections::HashSet;

use super::types::{Bound, ClassDefinition, FeatureClasses};
use crate::literal::Literal;

/// A feature takes part in completion when any class is numeric
pub fn is_numeric_feature(classes: &FeatureClasses) -> bool {
    classes.values().any(ClassDefinition::is_numeric)
}

/// An authored class placed on the real line
struct Placed<'a> {
    name: &'a str,
    lo: (f64, Bound),
    hi: (f64, Bound),
}

/// Complete the classes of one feature.
///
/// Returns `None` when the feature is not numeric, or when some bound is a
/// string or unresolved name and no total order exists.
pub fn complete_classes(classes: &FeatureClasses) -> Option<FeatureClasses> {
    if !is_numeric_feature(classes) {
        return None;
    }

    let mut placed = Vec::with_capacity(classes.len());
    for (name, definition) in classes {
        let (lo, hi) = match definition {
            ClassDefinition::Point(literal) => {
                let bound = Bound::Value(literal.clone());
                let value = literal.as_f64()?;
                ((value, bound.clone()), (value, bound))
            }
            ClassDefinition::Interval { min, max } => {
                ((min.as_f64()?, min.clone()), (max.as_f64()?, max.clone()))
            }
        };
        let (lo, hi) = if lo.0 <= hi.0 { (lo, hi) } else { (hi, lo) };
        placed.push(Placed { name, lo, hi });
    }

    // stable, so ties keep authoring order
    placed.sort_by(|a, b| a.lo.0.total_cmp(&b.lo.0));

    let authored: HashSet<&str> = classes.keys().map(String::as_str).collect();
    let mut completed = FeatureClasses::with_capacity(placed.len() * 2 + 1);
    let mut frontier = (f64::NEG_INFINITY, Bound::Min);

    for class in placed {
        if class.lo.0 > frontier.0 {
            let filler = filler_name(&completed, &authored);
            completed.insert(
                filler,
                ClassDefinition::Interval {
                    min: frontier.1.clone(),
                    max: class.lo.1.clone(),
                },
            );
        }

        let advance = class.hi.0 > frontier.0;
        let hi = class.hi.clone();
        completed.insert(class.name.to_string(), settle(class.lo, class.hi));
        if advance {
            frontier = hi;
        }
    }

    if frontier.0 < f64::INFINITY {
        let filler = filler_name(&completed, &authored);
        completed.insert(
            filler,
            ClassDefinition::Interval {
                min: frontier.1,
                max: Bound::Max,
            },
        );
    }

    Some(completed)
}

/// Equal finite ends collapse to a point
fn settle(lo: (f64, Bound), hi: (f64, Bound)) -> ClassDefinition {
    match lo {
        (value, Bound::Value(literal)) if value == hi.0 && value.is_finite() => {
            ClassDefinition::Point(literal)
        }
        (_, min) => ClassDefinition::Interval { min, max: hi.1 },
    }
}

/// `class <n>` where n is the filler's 1-based position, skipping taken names
fn filler_name(completed: &FeatureClasses, authored: &HashSet<&str>) -> String {
    let mut n = completed.len() + 1;
    loop {
        let name = format!("class {}", n);
        if !authored.contains(name.as_str()) && !completed.contains_key(&name) {
            return name;
        }
        n += 1;
    }
}

/// Whether the classes already tile the real line without gaps or overlaps
pub fn is_complete(classes: &FeatureClasses) -> bool {
    let mut spans = Vec::with_capacity(classes.len());
    for definition in classes.values() {
        let (lo, hi) = match definition {
            ClassDefinition::Point(Literal::Integer(v)) => (*v as f64, *v as f64),
            ClassDefinition::Point(Literal::Float(v)) => (*v, *v),
            ClassDefinition::Point(_) => return false,
            ClassDefinition::Interval { min, max } => match (min.as_f64(), max.as_f64()) {
                (Some(lo), Some(hi)) => (lo.min(hi), lo.max(hi)),
                _ => return false,
            },
        };
        spans.push((lo, hi));
    }
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut frontier = f64::NEG_INFINITY;
    for (lo, hi) in spans {
        if lo > frontier || hi < frontier {
            return false;
        }
        frontier = hi;
    }
    frontier == f64::INFINITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::parse_literal;

    fn interval(min: &str, max: &str) -> ClassDefinition {
        ClassDefinition::Interval {
            min: Bound::parse(min),
            max: Bound::parse(max),
        }
    }

    fn classes(entries: &[(&str, ClassDefinition)]) -> FeatureClasses {
        entries
            .iter()
            .map(|(name, def)| (name.to_string(), def.clone()))
            .collect()
    }

    fn rendered(classes: &FeatureClasses) -> Vec<String> {
        classes
            .iter()
            .map(|(name, def)| format!("{} :: {}", name, def))
            .collect()
    }

    #[test]
    fn test_gap_between_low_and_high() {
        let authored = classes(&[("Low", interval("min", "50")), ("High", interval("80", "max"))]);
        let completed = complete_classes(&authored).unwrap();

        assert_eq!(
            rendered(&completed),
            vec!["Low :: min to 50", "class 2 :: 50 to 80", "High :: 80 to max"]
        );
        assert!(is_complete(&completed));
    }

    #[test]
    fn test_open_ends_are_closed() {
        let authored = classes(&[("Mid", interval("10", "20"))]);
        let completed = complete_classes(&authored).unwrap();

        assert_eq!(
            rendered(&completed),
            vec!["class 1 :: min to 10", "Mid :: 10 to 20", "class 3 :: 20 to max"]
        );
    }

    #[test]
    fn test_points_reversed_bounds_and_collapse() {
        let authored = classes(&[
            ("Off", ClassDefinition::Point(parse_literal("0"))),
            ("On", interval("max", "0")),
            ("Exact", interval("-2.5", "-2.5")),
        ]);
        let completed = complete_classes(&authored).unwrap();

        assert_eq!(
            rendered(&completed),
            vec![
                "class 1 :: min to -2.5",
                "Exact :: is -2.5",
                "class 3 :: -2.5 to 0",
                "Off :: is 0",
                "On :: 0 to max",
            ]
        );
        assert!(is_complete(&completed));
    }

    #[test]
    fn test_filler_name_skips_authored_names() {
        let authored = classes(&[
            ("Low", interval("min", "1")),
            ("class 2", interval("5", "6")),
        ]);
        let completed = complete_classes(&authored).unwrap();
        let names: Vec<&str> = completed.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["Low", "class 3", "class 2", "class 4"]);
    }

    #[test]
    fn test_overlaps_are_kept() {
        let authored = classes(&[("A", interval("min", "10")), ("B", interval("5", "max"))]);
        let completed = complete_classes(&authored).unwrap();
        assert_eq!(rendered(&completed), vec!["A :: min to 10", "B :: 5 to max"]);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let authored = classes(&[
            ("Low", interval("min", "50")),
            ("Peak", ClassDefinition::Point(parse_literal("65"))),
            ("High", interval("80", "max")),
        ]);
        let once = complete_classes(&authored).unwrap();
        let twice = complete_classes(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unresolved_bound_skips_completion() {
        let authored = classes(&[("Low", interval("min", "p5")), ("High", interval("80", "max"))]);
        assert!(complete_classes(&authored).is_none());
    }

    #[test]
    fn test_categorical_feature_is_not_numeric() {
        let authored = classes(&[
            ("On", ClassDefinition::Point(parse_literal("\"on\""))),
            ("Off", ClassDefinition::Point(parse_literal("\"off\""))),
        ]);
        assert!(!is_numeric_feature(&authored));
        assert!(complete_classes(&authored).is_none());
    }

    #[test]
    fn test_mixed_string_point_skips_completion() {
        let authored = classes(&[
            ("Low", interval("min", "1")),
            ("Odd", ClassDefinition::Point(parse_literal("\"odd\""))),
        ]);
        assert!(complete_classes(&authored).is_none());
    }
}
