#![deny(missing_docs)]

//! # Postman2OAS Core
//!
//! Converts Postman Collection v2.1 documents into OpenAPI 3.1.
//!
//! Pipeline: JSON -> [`Collection`] tree -> assembled document ->
//! reference-resolved document -> writer / validator.

/// Shared error types.
pub mod error;

/// Conversion options.
pub mod config;

/// Text cleanup and identifier helpers.
pub mod strings;

/// Postman collection model.
pub mod postman;

/// OpenAPI document building, resolution and validation.
pub mod oas;

/// Collection file loading.
pub mod loader;

/// JSON / YAML output.
pub mod writer;

pub use config::ConversionOptions;
pub use error::{AppError, AppResult};
pub use loader::{load_collection, parse_collection_str};
pub use oas::{resolve_references, validate_document, ValidationReport};
pub use postman::Collection;
pub use writer::{to_json_string, to_yaml_string, write_outputs};

use serde_json::Value;

/// Assembles the OpenAPI document for `collection` and, unless disabled in
/// its options, resolves repeated inline objects into components.
pub fn convert(collection: &Collection) -> Value {
    let document = collection.to_openapi();
    if collection.options.resolve_references {
        resolve_references(&document)
    } else {
        document
    }
}
