//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Only input problems surface here. Malformed example bodies, unknown auth
/// types and template-only URLs degrade locally and never reach this type.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The collection file does not exist.
    #[from(ignore)]
    #[display("Collection file not found: {_0}")]
    NotFound(String),

    /// The collection file is not parseable JSON.
    #[from(ignore)]
    #[display("Invalid JSON in collection file: {_0}")]
    InvalidJson(String),

    /// The JSON parsed but is not a Postman collection.
    #[from(ignore)]
    #[display("Invalid collection structure: {_0}")]
    InvalidShape(String),

    /// JSON/YAML output could not be produced.
    #[from(ignore)]
    #[display("Serialization Error: {_0}")]
    Serialization(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
