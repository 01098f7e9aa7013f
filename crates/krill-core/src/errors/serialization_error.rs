//! Index serialization errors.

use std::path::PathBuf;

use super::error_code::{self, KrillErrorCode};

/// Errors that can occur while writing or merging the JSON index.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Index path {path} is not writable: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Existing index {path} is not a valid identifier index: {message}")]
    CorruptIndex { path: PathBuf, message: String },

    #[error("Failed to encode index: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to lock index {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KrillErrorCode for SerializationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CorruptIndex { .. } => error_code::CORRUPT_INDEX,
            _ => error_code::SERIALIZATION_ERROR,
        }
    }
}
