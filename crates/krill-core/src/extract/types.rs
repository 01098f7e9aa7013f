//! Extraction types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logging level, named after the logger method that emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// Every level, lowest severity first.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// The logger method name for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Match a method name exactly as written in source (case-sensitive).
    pub fn from_method(name: &str) -> Option<Level> {
        match name {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            "critical" => Some(Level::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A level name that is not one of the five known levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    /// Case-insensitive, so `"INFO"` from a host logger config also parses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_method(&s.trim().to_ascii_lowercase()).ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// A single logging call found in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Zero-based position among the recognized calls of the file.
    pub sequence_index: u32,
    pub level: Level,
    /// Decoded literal message, or the raw argument source when not a literal.
    pub message_text: String,
    /// Zero-based line of the call.
    pub line: u32,
    /// Zero-based column of the call.
    pub column: u32,
}
