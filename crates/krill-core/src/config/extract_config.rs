//! Extraction configuration.

use serde::{Deserialize, Serialize};

/// Module-level variable that declares a file's root key.
pub const DEFAULT_ROOT_KEY_VARIABLE: &str = "CKRILL_API_KEY";

/// Configuration for the call-site extractor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractConfig {
    /// Variable holding the declared root key. Default: `CKRILL_API_KEY`.
    pub root_key_variable: Option<String>,
}

impl ExtractConfig {
    /// Returns the effective root key variable name.
    pub fn effective_root_key_variable(&self) -> &str {
        self.root_key_variable
            .as_deref()
            .unwrap_or(DEFAULT_ROOT_KEY_VARIABLE)
    }
}
