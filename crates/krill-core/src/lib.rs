//! krill-core: Stable identifiers for logging call sites
//!
//! This crate maps every logging call in a Python source file to a short,
//! stable identifier and resolves message text back to it at runtime:
//! - Extract: tree-sitter scan for `<receiver>.<level>(message, ...)` calls
//! - Allocate: level filtering and sequential, zero-padded numbering
//! - Index: merge-aware atomic JSON writer and per-call resolver
//! - Generate: extract → allocate → write for one source file
//! - Tracker: per-logger list of resolved identifiers
//! - Config: layered TOML configuration
//! - Errors: one error enum per subsystem with stable codes
//! - Tracing: `tracing` subscriber setup

pub mod allocate;
pub mod config;
pub mod errors;
pub mod extract;
pub mod generate;
pub mod index;
pub mod tracing;
pub mod tracker;

// Re-exports for convenience
pub use allocate::{
    Allocation, Allocator, EnvMarkedScheme, IdentifierScheme, IndexEntry, LevelFilter,
    PlainScheme,
};
pub use config::{ConfigOverrides, EnvPlacement, KrillConfig};
pub use errors::{
    ConfigError, ExtractionError, GenerateError, KrillErrorCode, ResolveError,
    SerializationError,
};
pub use extract::{CallSite, Level, LogCallExtractor, SourceScan};
pub use generate::{generate, GenerateOptions, GenerateSummary, Generator};
pub use index::{find, Identifier, Index, Lookup, Miss, Resolver};
pub use tracker::IdentifierTracker;
