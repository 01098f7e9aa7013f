//! Resolver errors.
//!
//! A lookup miss is not an error; see [`crate::index::Lookup`].

use super::error_code::{self, KrillErrorCode};

/// Errors that can occur while resolving an identifier.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Identifier for {key}/{subkey} is {len} bytes, limit is {max}")]
    ResultTooLarge {
        key: String,
        subkey: String,
        len: usize,
        max: usize,
    },
}

impl KrillErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        error_code::RESULT_TOO_LARGE
    }
}
