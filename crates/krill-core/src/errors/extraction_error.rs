//! Call-site extraction errors.

use std::path::PathBuf;

use super::error_code::{self, KrillErrorCode};

/// Errors that can occur while scanning a source file for logging calls.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Cannot read source file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file {path} is not valid UTF-8 text")]
    NotText { path: PathBuf },

    #[error("Tree-sitter error: {message}")]
    TreeSitter { message: String },

    /// A level call whose argument list cannot be delimited.
    /// `line` and `column` are 1-based.
    #[error("Unbalanced `{method}(` call at line {line}, column {column}")]
    UnbalancedCall {
        method: String,
        line: u32,
        column: u32,
    },

    #[error("No `{variable} = \"...\"` root key declaration found")]
    MissingRootKey { variable: String },
}

impl KrillErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedCall { .. } => error_code::UNBALANCED_CALL,
            Self::MissingRootKey { .. } => error_code::MISSING_ROOT_KEY,
            _ => error_code::EXTRACTION_ERROR,
        }
    }
}
