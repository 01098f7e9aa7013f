//! Per-logger bookkeeping of resolved identifiers.

use std::path::{Path, PathBuf};

use crate::config::ResolveConfig;
use crate::errors::ResolveError;
use crate::index::{Identifier, Lookup, Resolver};

/// Resolves messages against one root key and remembers every outcome in
/// call order. Owned by the caller; nothing is shared between trackers.
#[derive(Debug, Clone)]
pub struct IdentifierTracker {
    resolver: Resolver,
    json_path: PathBuf,
    key: String,
    ids: Vec<Option<Identifier>>,
}

impl IdentifierTracker {
    pub fn new(json_path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            resolver: Resolver::default(),
            json_path: json_path.into(),
            key: key.into(),
            ids: Vec::new(),
        }
    }

    /// Tracker whose resolver honours `[resolve]` settings.
    pub fn from_config(
        json_path: impl Into<PathBuf>,
        key: impl Into<String>,
        config: &ResolveConfig,
    ) -> Self {
        Self::new(json_path, key).with_resolver(Resolver::from_config(config))
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve `message` and append the outcome. A miss is recorded as
    /// `None`; an oversized identifier is an error and records nothing.
    pub fn record(&mut self, message: &str) -> Result<Lookup, ResolveError> {
        let lookup = self.resolver.find(&self.json_path, &self.key, message)?;
        self.ids.push(lookup.identifier().cloned());
        Ok(lookup)
    }

    /// Every outcome so far, oldest first.
    pub fn identifiers(&self) -> &[Option<Identifier>] {
        &self.ids
    }

    /// Most recent outcome, if anything was recorded.
    pub fn last(&self) -> Option<&Identifier> {
        self.ids.last().and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
