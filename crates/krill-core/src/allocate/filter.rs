//! Level filter.

use std::fmt;

use crate::errors::ConfigError;
use crate::extract::Level;

/// Set of levels that receive identifiers. The empty set admits every level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelFilter {
    bits: u8,
}

impl LevelFilter {
    /// Admits every level.
    pub const fn all() -> Self {
        Self { bits: 0 }
    }

    /// Build a filter from level names, case-insensitively.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut filter = Self::all();
        for name in names {
            let level = name
                .as_ref()
                .parse::<Level>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "target_levels".to_string(),
                    message: e.to_string(),
                })?;
            filter.insert(level);
        }
        Ok(filter)
    }

    pub fn insert(&mut self, level: Level) {
        self.bits |= Self::bit(level);
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Whether a call site at `level` gets an identifier.
    pub fn admits(&self, level: Level) -> bool {
        self.is_empty() || self.bits & Self::bit(level) != 0
    }

    fn bit(level: Level) -> u8 {
        match level {
            Level::Debug => 1 << 0,
            Level::Info => 1 << 1,
            Level::Warning => 1 << 2,
            Level::Error => 1 << 3,
            Level::Critical => 1 << 4,
        }
    }
}

impl FromIterator<Level> for LevelFilter {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut filter = Self::all();
        for level in iter {
            filter.insert(level);
        }
        filter
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("all");
        }
        let names: Vec<&str> = Level::ALL
            .into_iter()
            .filter(|l| self.bits & Self::bit(*l) != 0)
            .map(Level::as_str)
            .collect();
        f.write_str(&names.join(","))
    }
}
