//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Largest identifier a lookup will return, in bytes.
pub const DEFAULT_MAX_IDENTIFIER_LEN: usize = 256;

/// Configuration for the index resolver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolveConfig {
    /// Maximum identifier length in bytes. Default: 256.
    pub max_identifier_len: Option<usize>,
}

impl ResolveConfig {
    /// Returns the effective maximum identifier length, defaulting to 256.
    pub fn effective_max_identifier_len(&self) -> usize {
        self.max_identifier_len.unwrap_or(DEFAULT_MAX_IDENTIFIER_LEN)
    }
}
