//! Identifier formatting configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minimum number of counter digits.
pub const DEFAULT_MIN_WIDTH: usize = 3;

/// Where the environment marker goes in an environment-tagged identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvPlacement {
    /// `<marker><sep><prefix><counter>`
    Prefix,
    /// `<prefix><marker><sep><counter>`
    Infix,
    /// `<prefix><counter><sep><marker>`
    #[default]
    Suffix,
}

impl FromStr for EnvPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "infix" => Ok(Self::Infix),
            "suffix" => Ok(Self::Suffix),
            other => Err(format!("unknown env placement '{other}'")),
        }
    }
}

/// Configuration for identifier allocation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IdentifierConfig {
    /// Prefix used when the caller does not pass one. Default: empty.
    pub prefix: Option<String>,
    /// Minimum counter width. Default: 3.
    pub min_width: Option<usize>,
    /// Opaque environment marker, copied verbatim into tagged identifiers.
    pub env_marker: Option<String>,
    /// Placement of the environment marker. Default: suffix.
    pub env_placement: Option<EnvPlacement>,
    /// Separator between the marker and the rest. Default: empty.
    pub env_separator: Option<String>,
}

impl IdentifierConfig {
    /// Returns the effective prefix, defaulting to the empty string.
    pub fn effective_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    /// Returns the effective minimum width, defaulting to 3.
    pub fn effective_min_width(&self) -> usize {
        self.min_width.unwrap_or(DEFAULT_MIN_WIDTH)
    }

    /// Returns the effective marker placement.
    pub fn effective_env_placement(&self) -> EnvPlacement {
        self.env_placement.unwrap_or_default()
    }

    /// Returns the effective marker separator.
    pub fn effective_env_separator(&self) -> &str {
        self.env_separator.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_parses_case_insensitively() {
        assert_eq!("Prefix".parse::<EnvPlacement>(), Ok(EnvPlacement::Prefix));
        assert_eq!(" infix ".parse::<EnvPlacement>(), Ok(EnvPlacement::Infix));
        assert!("middle".parse::<EnvPlacement>().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = IdentifierConfig::default();
        assert_eq!(cfg.effective_prefix(), "");
        assert_eq!(cfg.effective_min_width(), 3);
        assert_eq!(cfg.effective_env_placement(), EnvPlacement::Suffix);
        assert_eq!(cfg.effective_env_separator(), "");
    }
}
