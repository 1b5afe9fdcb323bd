//! Shared source-location types used by parsers, errors and log events

pub mod span;

pub use span::{Position, SourceMap, Span};
