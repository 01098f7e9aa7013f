//! Error handling for krill.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod extraction_error;
pub mod generate_error;
pub mod resolve_error;
pub mod serialization_error;

pub use config_error::ConfigError;
pub use error_code::KrillErrorCode;
pub use extraction_error::ExtractionError;
pub use generate_error::GenerateError;
pub use resolve_error::ResolveError;
pub use serialization_error::SerializationError;
