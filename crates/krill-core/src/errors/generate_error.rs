//! Generation errors.

use super::error_code::KrillErrorCode;
use super::{ConfigError, ExtractionError, SerializationError};

/// Errors that abort a generation run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl KrillErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction(e) => e.error_code(),
            Self::Serialization(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
