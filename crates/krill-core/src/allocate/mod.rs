//! Identifier allocation.
//!
//! Turns call sites into `(root_key, subkey, identifier)` entries: filter by
//! level, number the survivors from 1 without gaps, format with a scheme.

pub mod allocator;
pub mod filter;
pub mod scheme;

pub use allocator::{Allocation, Allocator, IndexEntry};
pub use filter::LevelFilter;
pub use scheme::{EnvMarkedScheme, IdentifierScheme, PlainScheme};
