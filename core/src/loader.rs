//! # Collection Loader
//!
//! Reads a collection file and turns it into the model tree, distinguishing a
//! missing file, unparseable JSON and a JSON document of the wrong shape.

use crate::config::ConversionOptions;
use crate::error::{AppError, AppResult};
use crate::postman::Collection;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Loads and parses a collection file.
pub fn load_collection(path: &Path, options: &ConversionOptions) -> AppResult<Collection> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::Io(e),
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Read collection file");
    parse_collection_str(&text, options)
}

/// Parses collection JSON text.
pub fn parse_collection_str(text: &str, options: &ConversionOptions) -> AppResult<Collection> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AppError::InvalidJson(e.to_string()))?;
    Collection::from_value(&value, options)
}
