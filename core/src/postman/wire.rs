//! # Postman Collection v2.1 Wire Format
//!
//! Serde definitions mirroring the JSON layout of an exported collection.
//! Almost everything is optional in the wild, so these types lean on
//! `#[serde(default)]`, untagged enums for fields that come in several shapes,
//! and the `lenient_*` helpers so that one odd value never sinks the item
//! holding it. Anything discarded along the way is logged at `warn`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Root of an exported collection.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCollection {
    /// Collection metadata. Required.
    pub info: RawInfo,
    /// Top-level folders and requests.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item: Vec<RawItem>,
    /// Collection-wide auth.
    #[serde(default, deserialize_with = "lenient_option")]
    pub auth: Option<RawAuth>,
}

/// Collection metadata (`info`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    /// Collection name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Collection version.
    #[serde(default, deserialize_with = "lenient_option")]
    pub version: Option<RawVersion>,
    /// Collection description.
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<RawDescription>,
    /// Schema URL of the collection format.
    #[serde(default, deserialize_with = "lenient_string")]
    pub schema: Option<String>,
}

/// `info.version`: a plain string or a semver object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawVersion {
    /// `"1.2.0"`
    Text(String),
    /// `1`
    Number(serde_json::Number),
    /// `{"major": 1, "minor": 2, "patch": 0}`
    Semver {
        /// Major version.
        #[serde(default)]
        major: u64,
        /// Minor version.
        #[serde(default)]
        minor: u64,
        /// Patch version.
        #[serde(default)]
        patch: u64,
    },
}

impl RawVersion {
    /// Renders the version as a string.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Semver {
                major,
                minor,
                patch,
            } => format!("{}.{}.{}", major, minor, patch),
        }
    }
}

/// A description: plain text or a `{content, type}` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawDescription {
    /// Plain text.
    Text(String),
    /// Rich description object.
    Rich {
        /// Description body.
        #[serde(default, deserialize_with = "lenient_string")]
        content: Option<String>,
    },
}

impl RawDescription {
    /// The description text, empty when absent.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Rich { content } => content.as_deref().unwrap_or(""),
        }
    }
}

/// Text of an optional description, empty when absent.
pub fn description_text(description: &Option<RawDescription>) -> &str {
    description.as_ref().map(RawDescription::text).unwrap_or("")
}

/// A folder or request node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Postman item id.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// Item description.
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<RawDescription>,
    /// Request definition; absent on folders.
    #[serde(default, deserialize_with = "lenient_option")]
    pub request: Option<RawRequest>,
    /// Recorded example responses.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub response: Vec<RawResponse>,
    /// Item-level auth.
    #[serde(default, deserialize_with = "lenient_option")]
    pub auth: Option<RawAuth>,
    /// Child nodes.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item: Vec<RawItem>,
}

/// `request`: either a bare URL string or a full request object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRequest {
    /// Shorthand: a GET to this URL.
    Url(String),
    /// Full request object.
    Full(Box<RawRequestObject>),
}

/// Full request object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequestObject {
    /// HTTP method.
    #[serde(default, deserialize_with = "lenient_string")]
    pub method: Option<String>,
    /// Request URL.
    #[serde(default, deserialize_with = "lenient_option")]
    pub url: Option<RawUrl>,
    /// Pre-parsed URL written by some exporters; wins over `url`.
    #[serde(default, rename = "urlObject", deserialize_with = "lenient_option")]
    pub url_object: Option<RawUrl>,
    /// Request headers.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub header: Vec<RawKeyValue>,
    /// Request body.
    #[serde(default, deserialize_with = "lenient_option")]
    pub body: Option<RawBody>,
    /// Request-level auth.
    #[serde(default, deserialize_with = "lenient_option")]
    pub auth: Option<RawAuth>,
    /// Request description.
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<RawDescription>,
}

/// A URL: raw string or structured object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUrl {
    /// `"https://api.example.com/users"`
    Text(String),
    /// Structured URL object.
    Structured(RawUrlObject),
}

impl RawUrl {
    /// The raw URL text, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(obj) => obj.raw.as_deref(),
        }
    }
}

/// Structured URL object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrlObject {
    /// Full URL as typed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw: Option<String>,
    /// Scheme without `://`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub protocol: Option<String>,
    /// Host labels.
    #[serde(default, deserialize_with = "lenient_option")]
    pub host: Option<RawSegments>,
    /// Path segments.
    #[serde(default, deserialize_with = "lenient_option")]
    pub path: Option<RawSegments>,
    /// Port, as string or number.
    #[serde(default)]
    pub port: Option<Value>,
    /// Query parameters.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub query: Vec<RawKeyValue>,
    /// Fragment.
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: Option<String>,
}

/// Host or path: one dotted/slashed string or a list of segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSegments {
    /// `"api.example.com"` or `"users/:id"`
    Joined(String),
    /// `["api", "example", "com"]`
    List(Vec<RawSegment>),
}

impl RawSegments {
    /// Splits into segments using `separator` for the joined form.
    pub fn segments(&self, separator: char) -> Vec<String> {
        match self {
            Self::Joined(s) if s.is_empty() => Vec::new(),
            Self::Joined(s) => s.split(separator).map(str::to_string).collect(),
            Self::List(items) => items.iter().map(RawSegment::text).collect(),
        }
    }
}

/// A single host/path segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSegment {
    /// Literal segment.
    Text(String),
    /// Numeric literal such as a version segment.
    Number(serde_json::Number),
    /// `{"type": "string", "value": "users"}`
    Object {
        /// Segment value.
        #[serde(default, deserialize_with = "lenient_string")]
        value: Option<String>,
    },
}

impl RawSegment {
    fn text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Object { value } => value.clone().unwrap_or_default(),
        }
    }
}

/// Key/value entry used by headers and query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawKeyValue {
    /// Entry key.
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
    /// Entry value.
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    /// Entry description.
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<RawDescription>,
    /// Disabled entries are ignored.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
}

/// Request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBody {
    /// Body mode (`raw`, `formdata`, `urlencoded`, `file`, `graphql`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: Option<String>,
    /// Raw text body.
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw: Option<String>,
    /// Multipart fields.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub formdata: Vec<RawFormField>,
    /// URL-encoded fields.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub urlencoded: Vec<RawFormField>,
    /// Binary file reference.
    #[serde(default, deserialize_with = "lenient_option")]
    pub file: Option<RawBodyFile>,
    /// GraphQL payload.
    #[serde(default, deserialize_with = "lenient_option")]
    pub graphql: Option<RawGraphQl>,
    /// Mode options.
    #[serde(default, deserialize_with = "lenient_option")]
    pub options: Option<RawBodyOptions>,
    /// Disabled bodies are not emitted.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
}

/// Form field (`formdata` / `urlencoded`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormField {
    /// Field name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
    /// Example value.
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    /// Field description.
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<RawDescription>,
    /// `text` or `file`.
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub field_type: Option<String>,
    /// Disabled fields are ignored.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
}

/// Binary file body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBodyFile {
    /// Local file path.
    #[serde(default, deserialize_with = "lenient_string")]
    pub src: Option<String>,
    /// Declared content type.
    #[serde(default, rename = "content-type", alias = "contentType", deserialize_with = "lenient_string")]
    pub content_type: Option<String>,
}

/// GraphQL body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGraphQl {
    /// Query document.
    #[serde(default, deserialize_with = "lenient_string")]
    pub query: Option<String>,
    /// Variables, usually a JSON string.
    #[serde(default)]
    pub variables: Option<Value>,
}

/// Body options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBodyOptions {
    /// Options for `raw` mode.
    #[serde(default, deserialize_with = "lenient_option")]
    pub raw: Option<RawRawOptions>,
}

/// Options for `raw` mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRawOptions {
    /// Language hint (`json`, `xml`, ...).
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

/// Auth block: a `type` plus one parameter list per scheme.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuth {
    /// Scheme type string.
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub auth_type: Option<String>,
    /// Scheme-specific parameter lists, keyed by scheme.
    #[serde(flatten)]
    pub parameters: Map<String, Value>,
}

/// Recorded example response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    /// Response id.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// Example name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Status code.
    #[serde(default, deserialize_with = "lenient_option")]
    pub code: Option<u16>,
    /// Status text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Response headers.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub header: Vec<RawKeyValue>,
    /// Response body text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: Option<String>,
    /// Recorded cookies.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub cookie: Vec<Value>,
    /// Response time in milliseconds.
    #[serde(default, rename = "responseTime")]
    pub response_time: Option<Value>,
    /// Recording timestamp.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

/// Deserializes a list, tolerating `null`, non-list values and bad entries.
///
/// Entries that fail to deserialize are skipped rather than failing the
/// enclosing structure.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "Skipping malformed list entry");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(value = %other, "Expected a list, ignoring value");
            Vec::new()
        }
    })
}

/// Deserializes an optional value, turning a malformed one into `None`.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            warn!(error = %err, "Ignoring malformed value");
            Ok(None)
        }
    }
}

/// Deserializes optional text, rendering numbers and booleans as strings.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            warn!(value = %other, "Expected text, ignoring value");
            None
        }
    })
}

/// Deserializes a flag; `"true"` and non-zero numbers count as set.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_collection() {
        let json = r#"{"info": {"name": "Test"}, "item": []}"#;
        let collection: RawCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.info.name.as_deref(), Some("Test"));
        assert!(collection.item.is_empty());
        assert!(collection.auth.is_none());
    }

    #[test]
    fn test_version_shapes() {
        let v: RawVersion = serde_json::from_str(r#""2.1.0""#).unwrap();
        assert_eq!(v.as_text(), "2.1.0");
        let v: RawVersion = serde_json::from_str(r#"{"major": 1, "minor": 4, "patch": 2}"#).unwrap();
        assert_eq!(v.as_text(), "1.4.2");
    }

    #[test]
    fn test_description_shapes() {
        let d: RawDescription = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(d.text(), "plain");
        let d: RawDescription =
            serde_json::from_str(r#"{"content": "rich", "type": "text/plain"}"#).unwrap();
        assert_eq!(d.text(), "rich");
        assert_eq!(description_text(&None), "");
    }

    #[test]
    fn test_request_shorthand_url() {
        let item: RawItem =
            serde_json::from_str(r#"{"name": "Ping", "request": "https://example.com/ping"}"#)
                .unwrap();
        assert!(matches!(item.request, Some(RawRequest::Url(ref u)) if u == "https://example.com/ping"));
    }

    #[test]
    fn test_lenient_headers() {
        let json = r#"{"header": null, "code": 404, "status": "Not Found"}"#;
        let resp: RawResponse = serde_json::from_str(json).unwrap();
        assert!(resp.header.is_empty());
        assert_eq!(resp.code, Some(404));

        let json = r#"{"method": "GET", "header": [{"key": "Accept", "value": "application/json"}, 42]}"#;
        let req: RawRequestObject = serde_json::from_str(json).unwrap();
        assert_eq!(req.header.len(), 1);
        assert_eq!(req.header[0].key.as_deref(), Some("Accept"));

        let json = r#"{"method": "GET", "header": "Accept: */*"}"#;
        let req: RawRequestObject = serde_json::from_str(json).unwrap();
        assert!(req.header.is_empty());
    }

    #[test]
    fn test_segments_shapes() {
        let s: RawSegments = serde_json::from_str(r#"["api", "example", "com"]"#).unwrap();
        assert_eq!(s.segments('.'), vec!["api", "example", "com"]);
        let s: RawSegments = serde_json::from_str(r#""users/:id""#).unwrap();
        assert_eq!(s.segments('/'), vec!["users", ":id"]);
        let s: RawSegments =
            serde_json::from_str(r#"[{"type": "string", "value": "users"}, "42"]"#).unwrap();
        assert_eq!(s.segments('/'), vec!["users", "42"]);
    }

    #[test]
    fn test_auth_keeps_scheme_lists() {
        let json = r#"{"type": "bearer", "bearer": [{"key": "token", "value": "{{token}}", "type": "string"}]}"#;
        let auth: RawAuth = serde_json::from_str(json).unwrap();
        assert_eq!(auth.auth_type.as_deref(), Some("bearer"));
        assert!(auth.parameters.get("bearer").is_some_and(Value::is_array));
    }

    #[test]
    fn test_scalar_fields_tolerate_other_types() {
        let json = r#"{
            "name": 7,
            "id": 42,
            "description": 3,
            "request": {"method": "POST", "url": "https://x.io/b", "body": {"mode": "raw", "raw": "{}", "disabled": "false"}}
        }"#;
        let item: RawItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name.as_deref(), Some("7"));
        assert_eq!(item.id.as_deref(), Some("42"));
        assert!(item.description.is_none());
        let Some(RawRequest::Full(request)) = item.request else {
            panic!("expected a full request");
        };
        assert_eq!(request.method.as_deref(), Some("POST"));
        assert!(request.body.is_some_and(|body| !body.disabled));
    }

    #[test]
    fn test_numeric_path_segments() {
        let s: RawSegments = serde_json::from_str(r#"["v", 2, "users"]"#).unwrap();
        assert_eq!(s.segments('/'), vec!["v", "2", "users"]);
    }
}
