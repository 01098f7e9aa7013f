//! Index types.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::allocate::IndexEntry;

/// A short, stable code assigned to a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Subkey → identifier, in allocation order.
pub type RootEntries = IndexMap<String, Identifier>;

/// Root key → subkey → identifier. Insertion order is preserved on both
/// levels, so serializing the same index always yields the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    roots: IndexMap<String, RootEntries>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse index JSON. Anything other than an object of objects of
    /// strings is rejected.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    pub fn get(&self, root_key: &str, subkey: &str) -> Option<&Identifier> {
        self.roots.get(root_key)?.get(subkey)
    }

    pub fn root(&self, root_key: &str) -> Option<&RootEntries> {
        self.roots.get(root_key)
    }

    pub fn root_keys(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    /// Total number of subkeys across all root keys.
    pub fn len(&self) -> usize {
        self.roots.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge freshly allocated entries under `root_key`.
    ///
    /// Other root keys are untouched. New subkeys are appended; an existing
    /// subkey keeps its position and takes the new identifier. The root key
    /// is created even when `entries` is empty.
    pub fn merge(&mut self, root_key: &str, entries: &[IndexEntry]) {
        let root = self.roots.entry(root_key.to_string()).or_default();
        for entry in entries {
            root.insert(entry.subkey.clone(), entry.identifier.clone());
        }
    }
}
