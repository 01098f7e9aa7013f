//! The JSON identifier index: in-memory model, atomic writer, resolver.
//!
//! The file is the only contract between generation and resolution:
//! `{ "<root_key>": { "<subkey>": "<identifier>", ... }, ... }`.

pub mod resolver;
pub mod types;
pub mod writer;

pub use resolver::{find, Lookup, Miss, Resolver};
pub use types::{Identifier, Index};
pub use writer::write_index;
