//! # Example Body Inference
//!
//! Recorded example bodies are hand-edited JSON more often than not: comments,
//! trailing commas, smart quotes and `...` placeholders. This module repairs
//! that text into something `serde_json` accepts and infers a schema from the
//! parsed example.
//!
//! Inference is heuristic. Arrays and `null` produce an untyped schema.

use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

/// Repairs loosely formatted JSON example text.
///
/// In order: drops literal `\n` / `\t` escapes and `...` / `…` placeholders,
/// normalizes smart quotes, strips `//` comments (outside string literals),
/// then removes trailing commas before `}` or `]`.
pub fn repair_json_text(text: &str) -> String {
    let normalized = text
        .replace("\\n", "")
        .replace("\\t", "")
        .replace("...", "")
        .replace('\u{2026}', "")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let cleaned = strip_line_comments(&normalized);

    static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA_RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("Invalid regex"));
    re.replace_all(&cleaned, "$1").trim().to_string()
}

/// Removes `//` comments running to end of line, ignoring `//` inside strings.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = None;
        let bytes = line.as_bytes();

        for (idx, &b) in bytes.iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            if b == b'"' {
                in_string = true;
            } else if b == b'/' && bytes.get(idx + 1) == Some(&b'/') {
                cut = Some(idx);
                break;
            }
        }

        match cut {
            Some(idx) => {
                out.push_str(line[..idx].trim_end());
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Infers a schema for a single example value.
///
/// `string`, `integer`, `number`, `boolean` map directly; objects recurse into
/// `properties`; anything else yields `{}`.
pub fn infer_schema(value: &Value) -> Value {
    match value {
        Value::String(_) => json!({"type": "string"}),
        Value::Bool(_) => json!({"type": "boolean"}),
        Value::Number(num) => {
            if num.is_i64() || num.is_u64() {
                json!({"type": "integer"})
            } else {
                json!({"type": "number"})
            }
        }
        Value::Object(map) => object_schema_from_map(map),
        Value::Array(_) | Value::Null => json!({}),
    }
}

/// Schema for a response body example: always `type: object`.
///
/// Non-object examples (arrays, scalars) still get a bare object schema with
/// no properties.
pub fn response_body_schema(value: &Value) -> Value {
    match value {
        Value::Object(map) => object_schema_from_map(map),
        _ => json!({"type": "object"}),
    }
}

fn object_schema_from_map(map: &Map<String, Value>) -> Value {
    let properties: Map<String, Value> = map
        .iter()
        .map(|(key, v)| (key.clone(), infer_schema(v)))
        .collect();
    json!({"type": "object", "properties": properties})
}
