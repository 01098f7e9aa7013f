//! KrillErrorCode trait for host bindings.

/// Trait for converting krill errors to stable error codes.
/// Every error enum implements this so a host-language wrapper can branch
/// on a machine-readable code instead of parsing messages.
pub trait KrillErrorCode {
    /// Returns the error code string (e.g., "EXTRACTION_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted host string: `[ERROR_CODE] message`.
    fn host_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the host boundary.
pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const UNBALANCED_CALL: &str = "UNBALANCED_CALL";
pub const MISSING_ROOT_KEY: &str = "MISSING_ROOT_KEY";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const CORRUPT_INDEX: &str = "CORRUPT_INDEX";
pub const RESULT_TOO_LARGE: &str = "RESULT_TOO_LARGE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
