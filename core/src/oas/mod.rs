#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: typed builders for `info`, `servers`, `tags`.
//! - **inference**: example-body repair and schema inference.
//! - **ref_utils**: `$ref` construction and lookup.
//! - **resolver**: hoisting inline objects into `components`.
//! - **validation**: structural checks of the finished document.

pub mod document;
pub mod inference;
pub mod ref_utils;
pub mod resolver;
pub mod validation;

pub use document::{
    OpenApiContact, OpenApiInfo, OpenApiLicense, OpenApiServer, OpenApiServerVariable, OpenApiTag,
    OPENAPI_VERSION,
};
pub use resolver::{resolve_references, ComponentKind, ReferenceResolver};
pub use validation::{validate_document, Diagnostic, ValidationReport};
