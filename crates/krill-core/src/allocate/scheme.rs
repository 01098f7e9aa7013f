//! Identifier formatting schemes.
//!
//! A scheme turns `(prefix, counter)` into the identifier string. The plain
//! scheme is used unless the caller asks for environment-tagged identifiers,
//! in which case the configured environment scheme is used instead.

use crate::config::{EnvPlacement, IdentifierConfig};

/// Formatting strategy for identifiers.
pub trait IdentifierScheme: Send + Sync {
    /// Format the identifier for the `counter`-th allocated call site.
    /// `width` is the minimum number of counter digits.
    fn format(&self, prefix: &str, counter: u32, width: usize) -> String;
}

/// `<prefix><zero-padded counter>`, e.g. `001` or `logger042`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainScheme;

impl IdentifierScheme for PlainScheme {
    fn format(&self, prefix: &str, counter: u32, width: usize) -> String {
        format!("{prefix}{counter:0width$}")
    }
}

/// Plain identifier with an opaque environment marker inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvMarkedScheme {
    marker: String,
    placement: EnvPlacement,
    separator: String,
}

impl EnvMarkedScheme {
    pub fn new(marker: impl Into<String>, placement: EnvPlacement, separator: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            placement,
            separator: separator.into(),
        }
    }

    /// Build from `[identifier]` config; `None` when no marker is configured.
    pub fn from_config(config: &IdentifierConfig) -> Option<Self> {
        let marker = config.env_marker.as_deref()?;
        Some(Self::new(
            marker,
            config.effective_env_placement(),
            config.effective_env_separator(),
        ))
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl IdentifierScheme for EnvMarkedScheme {
    fn format(&self, prefix: &str, counter: u32, width: usize) -> String {
        let (marker, sep) = (&self.marker, &self.separator);
        match self.placement {
            EnvPlacement::Prefix => format!("{marker}{sep}{prefix}{counter:0width$}"),
            EnvPlacement::Infix => format!("{prefix}{marker}{sep}{counter:0width$}"),
            EnvPlacement::Suffix => format!("{prefix}{counter:0width$}{sep}{marker}"),
        }
    }
}
