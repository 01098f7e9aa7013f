//! Call-site extraction.
//!
//! Scans Python source with tree-sitter and yields the logging calls
//! (`<receiver>.<level>(message, ...)`) in lexical order.

pub mod error_tolerant;
pub mod extractor;
pub mod literal;
pub mod types;

pub use extractor::{CallSites, LogCallExtractor, SourceScan};
pub use types::{CallSite, Level, UnknownLevel};
