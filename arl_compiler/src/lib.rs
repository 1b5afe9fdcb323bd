//! Parser and validator for ARL knowledge documents
//!
//! An ARL document has a `[features]` section declaring classes over input
//! values, a `[rules]` section of named boolean expressions, and a
//! `[conclusions]` section combining features and rules into outputs.
//! [`Document`] parses all three and reports undefined references without
//! failing; malformed text is a [`SyntaxError`] carrying its section and line.

pub mod batch;
pub mod conclusions;
pub mod config;
pub mod document;
pub mod expression;
pub mod features;
pub mod file_processor;
pub mod literal;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod references;
pub mod rules;
pub mod statement;
pub mod syntax;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use conclusions::{ConclusionParser, ConclusionSet};
pub use document::{Document, DocumentError, DocumentParser, Interchange, VariableMapping};
pub use features::{FeatureParser, FeatureSet};
pub use literal::{parse_literal, Literal};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput, PipelineResult};
pub use references::MissingReport;
pub use rules::{RuleParser, RuleSet};
pub use syntax::{Section, SyntaxError};
