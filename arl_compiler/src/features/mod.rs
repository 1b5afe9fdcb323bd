//! Features section: named variables and their membership classes

mod completion;
mod parser;
mod types;
mod writer;

pub use completion::{complete_classes, is_complete, is_numeric_feature};
pub use parser::{parse_features, FeatureParser};
pub use types::{Bound, ClassDefinition, FeatureClasses, FeatureSet};
