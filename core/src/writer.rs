//! # Output Writer
//!
//! Serializes the finished document as JSON and YAML. Keys keep insertion
//! order in both formats.

use crate::error::{AppError, AppResult};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Pretty JSON with a trailing newline.
pub fn to_json_string(document: &Value) -> AppResult<String> {
    let mut out =
        serde_json::to_string_pretty(document).map_err(|e| AppError::Serialization(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// YAML prefixed with an explicit `---` document marker.
pub fn to_yaml_string(document: &Value) -> AppResult<String> {
    let yaml = serde_yaml::to_string(document).map_err(|e| AppError::Serialization(e.to_string()))?;
    if yaml.starts_with("---") {
        Ok(yaml)
    } else {
        Ok(format!("---\n{}", yaml))
    }
}

/// Writes both outputs, creating missing parent directories.
pub fn write_outputs(document: &Value, json_path: &Path, yaml_path: &Path) -> AppResult<()> {
    let json = to_json_string(document)?;
    let yaml = to_yaml_string(document)?;

    write_file(json_path, &json)?;
    write_file(yaml_path, &yaml)?;

    info!(
        json = %json_path.display(),
        yaml = %yaml_path.display(),
        "Wrote OpenAPI documents"
    );
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
