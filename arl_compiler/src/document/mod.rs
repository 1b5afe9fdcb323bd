//! Whole-document handling: sections, cascading parse, slicing, renaming
//! and the structured interchange form

mod error;
mod handler;
mod interchange;
mod remap;

pub use error::{DocumentError, DocumentResult};
pub use handler::{Document, DocumentParser};
pub use interchange::{Interchange, MissingCounts};
pub use remap::VariableMapping;
