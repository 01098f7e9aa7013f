//! Sequential identifier allocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::filter::LevelFilter;
use super::scheme::{IdentifierScheme, PlainScheme};
use crate::config::identifier_config::DEFAULT_MIN_WIDTH;
use crate::extract::CallSite;
use crate::index::Identifier;

/// One `(root_key, subkey, identifier)` triple bound for the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub root_key: String,
    /// Exact message text of the call site.
    pub subkey: String,
    pub identifier: Identifier,
}

/// Result of one allocation pass.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// Entries in call-site order; identifiers count up from 1.
    pub entries: Vec<IndexEntry>,
    /// Call sites rejected by the level filter.
    pub filtered_out: usize,
}

/// Assigns identifiers to call sites.
#[derive(Clone)]
pub struct Allocator {
    prefix: String,
    filter: LevelFilter,
    width: usize,
    scheme: Arc<dyn IdentifierScheme>,
}

impl Allocator {
    /// Plain scheme, minimum width 3.
    pub fn new(prefix: impl Into<String>, filter: LevelFilter) -> Self {
        Self {
            prefix: prefix.into(),
            filter,
            width: DEFAULT_MIN_WIDTH,
            scheme: Arc::new(PlainScheme),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_scheme(mut self, scheme: Arc<dyn IdentifierScheme>) -> Self {
        self.scheme = scheme;
        self
    }

    /// Number the admitted call sites from 1 in `sequence_index` order.
    /// Filtered-out sites do not consume a counter value.
    pub fn allocate<I>(&self, root_key: &str, sites: I) -> Allocation
    where
        I: IntoIterator<Item = CallSite>,
    {
        let mut sites: Vec<CallSite> = sites.into_iter().collect();
        sites.sort_by_key(|site| site.sequence_index);

        let mut allocation = Allocation::default();
        let mut counter: u32 = 0;
        for site in sites {
            if !self.filter.admits(site.level) {
                allocation.filtered_out += 1;
                continue;
            }
            counter += 1;
            let identifier = self.scheme.format(&self.prefix, counter, self.width);
            allocation.entries.push(IndexEntry {
                root_key: root_key.to_string(),
                subkey: site.message_text,
                identifier: Identifier::new(identifier),
            });
        }

        tracing::debug!(
            root_key,
            allocated = allocation.entries.len(),
            filtered_out = allocation.filtered_out,
            filter = %self.filter,
            "allocated identifiers"
        );
        allocation
    }
}
