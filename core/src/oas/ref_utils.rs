//! # Reference Utilities
//!
//! Helpers for building and reading local `#/components/{section}/{name}`
//! references. Component names are JSON Pointer escaped (`~0`, `~1`) and then
//! percent-encoded so that any name produces a well-formed URI fragment.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};

/// Characters left as-is in a pointer segment.
const POINTER_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `#/components/{section}/{name}` with `name` escaped.
pub fn component_ref(section: &str, name: &str) -> String {
    format!("#/components/{}/{}", section, encode_pointer_segment(name))
}

/// `{"$ref": "#/components/{section}/{name}"}`.
pub fn component_ref_value(section: &str, name: &str) -> Value {
    json!({ "$ref": component_ref(section, name) })
}

/// True when `value` is a Reference Object.
pub fn is_reference(value: &Value) -> bool {
    value.get("$ref").is_some_and(Value::is_string)
}

/// Extracts a component name from a `$ref` pointing at `#/components/{section}/{name}`.
///
/// Returns `None` for external references and other sections.
pub fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Looks up the target of a local `#/...` reference.
pub fn resolve_local_ref<'a>(document: &'a Value, ref_str: &str) -> Option<&'a Value> {
    let pointer = ref_str.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(document);
    }
    let mut current = document;
    for segment in pointer.strip_prefix('/')?.split('/') {
        let key = decode_pointer_segment(segment);
        current = match current {
            Value::Object(map) => map.get(&key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Escapes a JSON Pointer segment and percent-encodes it.
pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    utf8_percent_encode(&escaped, POINTER_SEGMENT).to_string()
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded.replace("~1", "/").replace("~0", "~")
}
