//! Identifier lookup.
//!
//! Every call reads and parses the index afresh so a regenerated file is
//! picked up immediately. A miss of any kind is a normal outcome returned as
//! [`Lookup::NotFound`]; only an oversized identifier is an error.

use std::path::Path;

use serde_json::Value;

use super::types::Identifier;
use crate::config::resolve_config::DEFAULT_MAX_IDENTIFIER_LEN;
use crate::config::ResolveConfig;
use crate::errors::ResolveError;

/// Why a lookup found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// The index file is missing or could not be read.
    Unreadable,
    /// The index is not JSON of the expected shape.
    Malformed,
    /// No such root key.
    UnknownKey,
    /// The root key exists but has no such subkey.
    UnknownSubkey,
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Identifier),
    NotFound(Miss),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            Lookup::Found(id) => Some(id),
            Lookup::NotFound(_) => None,
        }
    }

    pub fn into_identifier(self) -> Option<Identifier> {
        match self {
            Lookup::Found(id) => Some(id),
            Lookup::NotFound(_) => None,
        }
    }
}

/// Resolves `(key, subkey)` pairs against an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_identifier_len: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDENTIFIER_LEN)
    }
}

impl Resolver {
    pub fn new(max_identifier_len: usize) -> Self {
        Self { max_identifier_len }
    }

    pub fn from_config(config: &ResolveConfig) -> Self {
        Self::new(config.effective_max_identifier_len())
    }

    pub fn max_identifier_len(&self) -> usize {
        self.max_identifier_len
    }

    /// Load `json_path` and look up `key` / `subkey`.
    pub fn find(
        &self,
        json_path: &Path,
        key: &str,
        subkey: &str,
    ) -> Result<Lookup, ResolveError> {
        let bytes = match std::fs::read(json_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %json_path.display(), error = %e, "index unreadable");
                return Ok(Lookup::NotFound(Miss::Unreadable));
            }
        };
        match std::str::from_utf8(&bytes) {
            Ok(text) => self.find_in_str(text, key, subkey),
            Err(_) => {
                tracing::debug!(path = %json_path.display(), "index is not UTF-8");
                Ok(Lookup::NotFound(Miss::Malformed))
            }
        }
    }

    /// Look up `key` / `subkey` in already loaded index JSON.
    /// Matching is exact and case-sensitive.
    pub fn find_in_str(&self, json: &str, key: &str, subkey: &str) -> Result<Lookup, ResolveError> {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "index is not valid JSON");
                return Ok(Lookup::NotFound(Miss::Malformed));
            }
        };
        let Value::Object(roots) = value else {
            return Ok(Lookup::NotFound(Miss::Malformed));
        };
        let entries = match roots.get(key) {
            None => return Ok(self.miss(Miss::UnknownKey, key, subkey)),
            Some(Value::Object(entries)) => entries,
            Some(_) => return Ok(Lookup::NotFound(Miss::Malformed)),
        };
        let identifier = match entries.get(subkey) {
            None => return Ok(self.miss(Miss::UnknownSubkey, key, subkey)),
            Some(Value::String(identifier)) => identifier,
            Some(_) => return Ok(Lookup::NotFound(Miss::Malformed)),
        };

        if identifier.len() > self.max_identifier_len {
            return Err(ResolveError::ResultTooLarge {
                key: key.to_string(),
                subkey: subkey.to_string(),
                len: identifier.len(),
                max: self.max_identifier_len,
            });
        }
        Ok(Lookup::Found(Identifier::new(identifier.as_str())))
    }

    fn miss(&self, miss: Miss, key: &str, subkey: &str) -> Lookup {
        tracing::debug!(key, subkey, reason = ?miss, "identifier not found");
        Lookup::NotFound(miss)
    }
}

/// Look up `key` / `subkey` in the index at `json_path` with the default
/// 256-byte identifier limit.
pub fn find(
    json_path: impl AsRef<Path>,
    key: &str,
    subkey: &str,
) -> Result<Lookup, ResolveError> {
    Resolver::default().find(json_path.as_ref(), key, subkey)
}
