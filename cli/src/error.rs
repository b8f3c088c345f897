#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use postman2oas_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Error raised by the conversion core.
    #[display("{}", _0)]
    Core(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let err: CliError = AppError::NotFound("postman_collection.json".into()).into();
        assert_eq!(
            err.to_string(),
            "Collection file not found: postman_collection.json"
        );
    }

    #[test]
    fn test_string_is_general() {
        let err: CliError = String::from("validation failed").into();
        assert!(matches!(err, CliError::General(_)));
        assert_eq!(err.to_string(), "Operation failed: validation failed");
    }
}
