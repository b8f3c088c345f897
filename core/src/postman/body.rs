//! # Request Body Model
//!
//! Postman body modes and their OpenAPI Request Body Objects.

use crate::oas::inference::{infer_schema, repair_json_text};
use crate::postman::wire::{description_text, RawBody, RawFormField};
use crate::strings::string_formatting;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// A single `formdata` / `urlencoded` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name.
    pub key: String,
    /// Example value.
    pub value: Option<String>,
    /// Cleaned description.
    pub description: String,
    /// True for file upload fields.
    pub is_file: bool,
    /// Disabled fields are ignored.
    pub disabled: bool,
}

impl FormField {
    fn from_raw(raw: &RawFormField) -> Option<Self> {
        let key = raw.key.clone().filter(|k| !k.is_empty())?;
        Some(Self {
            key,
            value: raw.value.clone(),
            description: string_formatting(description_text(&raw.description)),
            is_file: raw.field_type.as_deref() == Some("file"),
            disabled: raw.disabled,
        })
    }
}

/// Language hint of a `raw` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLanguage {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
    /// `application/javascript`
    JavaScript,
    /// `text/html`
    Html,
    /// `text/plain`
    Text,
}

impl RawLanguage {
    fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("json") => Self::Json,
            Some("xml") => Self::Xml,
            Some("javascript") => Self::JavaScript,
            Some("html") => Self::Html,
            _ => Self::Text,
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::JavaScript => "application/javascript",
            Self::Html => "text/html",
            Self::Text => "text/plain",
        }
    }
}

/// A request body, one variant per Postman body mode.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Free text with a language hint.
    Raw {
        /// Body text.
        content: String,
        /// Language hint.
        language: RawLanguage,
    },
    /// `multipart/form-data` fields.
    FormData(Vec<FormField>),
    /// `application/x-www-form-urlencoded` fields.
    UrlEncoded(Vec<FormField>),
    /// Binary upload.
    File {
        /// Declared content type.
        content_type: Option<String>,
    },
    /// GraphQL query plus variables.
    GraphQl {
        /// Query document.
        query: String,
        /// Variables.
        variables: Value,
    },
    /// A disabled body or a mode we do not understand.
    Disabled,
}

impl RequestBody {
    /// Parses a body block. `None` when no mode-specific payload is present.
    pub fn parse(raw: &RawBody) -> Option<Self> {
        if raw.disabled {
            return Some(Self::Disabled);
        }

        let mode = raw.mode.as_deref().unwrap_or("raw");
        let body = match mode {
            "raw" => Self::Raw {
                content: raw.raw.clone().unwrap_or_default(),
                language: RawLanguage::from_hint(
                    raw.options
                        .as_ref()
                        .and_then(|o| o.raw.as_ref())
                        .and_then(|r| r.language.as_deref()),
                ),
            },
            "formdata" => Self::FormData(raw.formdata.iter().filter_map(FormField::from_raw).collect()),
            "urlencoded" => {
                Self::UrlEncoded(raw.urlencoded.iter().filter_map(FormField::from_raw).collect())
            }
            "file" => Self::File {
                content_type: raw.file.as_ref().and_then(|f| f.content_type.clone()),
            },
            "graphql" => {
                let graphql = raw.graphql.as_ref()?;
                Self::GraphQl {
                    query: graphql.query.clone().unwrap_or_default(),
                    variables: parse_graphql_variables(graphql.variables.as_ref()),
                }
            }
            other => {
                debug!(mode = other, "Ignoring unsupported body mode");
                Self::Disabled
            }
        };
        Some(body)
    }

    /// The media type this body is sent as.
    pub fn content_type(&self) -> String {
        match self {
            Self::Raw { language, .. } => language.content_type().to_string(),
            Self::FormData(_) => "multipart/form-data".to_string(),
            Self::UrlEncoded(_) => "application/x-www-form-urlencoded".to_string(),
            Self::GraphQl { .. } => "application/json".to_string(),
            Self::File { content_type } => content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            Self::Disabled => "application/octet-stream".to_string(),
        }
    }

    /// Builds the Request Body Object, or `None` when nothing should be emitted.
    pub fn to_openapi(&self) -> Option<Value> {
        let content_type = self.content_type();
        let media = match self {
            Self::Raw { content, .. } => raw_media(content, &content_type),
            Self::FormData(fields) | Self::UrlEncoded(fields) => json!({"schema": form_schema(fields)}),
            Self::GraphQl { query, variables } => json!({
                "schema": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "example": query},
                        "variables": {"type": "object", "example": variables}
                    },
                    "required": ["query"]
                }
            }),
            Self::File { .. } => json!({"schema": {"type": "string", "format": "binary"}}),
            Self::Disabled => return None,
        };

        let mut content = Map::new();
        content.insert(content_type, media);
        Some(json!({ "content": content }))
    }
}

fn raw_media(content: &str, content_type: &str) -> Value {
    if content_type.contains("json") {
        let text = if content.trim().is_empty() { "{}" } else { content };
        match serde_json::from_str::<Value>(&repair_json_text(text)) {
            Ok(example) => {
                return json!({"schema": infer_schema(&example), "example": example});
            }
            Err(e) => {
                warn!(error = %e, "Request body example is not valid JSON, keeping raw text");
                return json!({"schema": {"type": "string"}, "example": text});
            }
        }
    }

    json!({"schema": {"type": "string"}, "example": string_formatting(content)})
}

fn form_schema(fields: &[FormField]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields.iter().filter(|f| !f.disabled) {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!("string"));
        if !field.description.is_empty() {
            prop.insert("description".to_string(), json!(field.description));
        }
        if field.is_file {
            prop.insert("format".to_string(), json!("binary"));
        }
        if let Some(value) = field.value.as_ref().filter(|v| !v.is_empty()) {
            prop.insert("example".to_string(), json!(value));
        }
        properties.insert(field.key.clone(), Value::Object(prop));
        required.push(json!(field.key));
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}

/// GraphQL variables arrive as a JSON string; fall back to `{}` when unusable.
fn parse_graphql_variables(raw: Option<&Value>) -> Value {
    match raw {
        Some(Value::String(text)) if !text.trim().is_empty() => {
            serde_json::from_str(text).unwrap_or_else(|_| json!({}))
        }
        Some(value @ Value::Object(_)) => value.clone(),
        _ => json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(json: &str) -> RequestBody {
        let raw: RawBody = serde_json::from_str(json).unwrap();
        RequestBody::parse(&raw).unwrap()
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            body(r#"{"mode": "raw", "raw": "{}", "options": {"raw": {"language": "json"}}}"#).content_type(),
            "application/json"
        );
        assert_eq!(body(r#"{"mode": "raw", "raw": "<a/>", "options": {"raw": {"language": "xml"}}}"#).content_type(), "application/xml");
        assert_eq!(body(r#"{"mode": "raw", "raw": "hi"}"#).content_type(), "text/plain");
        assert_eq!(body(r#"{"mode": "formdata"}"#).content_type(), "multipart/form-data");
        assert_eq!(
            body(r#"{"mode": "urlencoded"}"#).content_type(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(body(r#"{"mode": "graphql", "graphql": {"query": "{ a }"}}"#).content_type(), "application/json");
        assert_eq!(body(r#"{"mode": "file", "file": {}}"#).content_type(), "application/octet-stream");
        assert_eq!(
            body(r#"{"mode": "file", "file": {"content-type": "image/png"}}"#).content_type(),
            "image/png"
        );
    }

    #[test]
    fn test_raw_json_example_is_structured() {
        let b = body(r#"{"mode": "raw", "raw": "{\"name\": \"Blueprint\", \"enroll\": true}", "options": {"raw": {"language": "json"}}}"#);
        assert_eq!(
            b.to_openapi().unwrap(),
            json!({
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "enroll": {"type": "boolean"}
                            }
                        },
                        "example": {"name": "Blueprint", "enroll": true}
                    }
                }
            })
        );
    }

    #[test]
    fn test_raw_json_malformed_falls_back_to_string() {
        let b = body(r#"{"mode": "raw", "raw": "{name: oops", "options": {"raw": {"language": "json"}}}"#);
        let out = b.to_openapi().unwrap();
        let media = &out["content"]["application/json"];
        assert_eq!(media["schema"], json!({"type": "string"}));
        assert_eq!(media["example"], json!("{name: oops"));
    }

    #[test]
    fn test_raw_text_example() {
        let b = body(r#"{"mode": "raw", "raw": "  say \"hi\"  "}"#);
        assert_eq!(
            b.to_openapi().unwrap(),
            json!({"content": {"text/plain": {"schema": {"type": "string"}, "example": "say &quot;hi&quot;"}}})
        );
    }

    #[test]
    fn test_formdata_schema() {
        let b = body(
            r#"{"mode": "formdata", "formdata": [
                {"key": "file", "type": "file", "src": "/tmp/a.pkg"},
                {"key": "name", "value": "App", "type": "text", "description": "Display name"},
                {"key": "old", "value": "x", "disabled": true}
            ]}"#,
        );
        assert_eq!(
            b.to_openapi().unwrap(),
            json!({
                "content": {
                    "multipart/form-data": {
                        "schema": {
                            "type": "object",
                            "properties": {
                                "file": {"type": "string", "format": "binary"},
                                "name": {"type": "string", "description": "Display name", "example": "App"}
                            },
                            "required": ["file", "name"]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_urlencoded_without_fields_has_no_required() {
        let out = body(r#"{"mode": "urlencoded", "urlencoded": []}"#).to_openapi().unwrap();
        let schema = &out["content"]["application/x-www-form-urlencoded"]["schema"];
        assert_eq!(schema, &json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn test_graphql_schema() {
        let b = body(r#"{"mode": "graphql", "graphql": {"query": "query { me { id } }", "variables": "{\"a\": 1}"}}"#);
        assert_eq!(
            b.to_openapi().unwrap()["content"]["application/json"]["schema"],
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "example": "query { me { id } }"},
                    "variables": {"type": "object", "example": {"a": 1}}
                },
                "required": ["query"]
            })
        );
    }

    #[test]
    fn test_graphql_without_payload_is_absent() {
        let raw: RawBody = serde_json::from_str(r#"{"mode": "graphql"}"#).unwrap();
        assert_eq!(RequestBody::parse(&raw), None);
    }

    #[test]
    fn test_disabled_and_unknown_modes_emit_nothing() {
        assert_eq!(body(r#"{"mode": "raw", "raw": "x", "disabled": true}"#).to_openapi(), None);
        assert_eq!(body(r#"{"mode": "protobuf"}"#).to_openapi(), None);
    }

    #[test]
    fn test_file_body() {
        let out = body(r#"{"mode": "file", "file": {"src": "a.bin"}}"#).to_openapi().unwrap();
        assert_eq!(
            out,
            json!({"content": {"application/octet-stream": {"schema": {"type": "string", "format": "binary"}}}})
        );
    }
}
