//! # URL Model
//!
//! Splits a Postman URL into protocol, host, path and query parts and derives
//! the OpenAPI path template, path parameters and server base URL from it.

use crate::postman::wire::{description_text, RawKeyValue, RawUrl, RawUrlObject};
use crate::strings::string_formatting;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// One query string entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Parameter name.
    pub key: String,
    /// Example value.
    pub value: Option<String>,
    /// Cleaned description.
    pub description: String,
    /// Disabled entries are not emitted.
    pub disabled: bool,
}

impl QueryParam {
    fn from_raw(raw: &RawKeyValue) -> Self {
        Self {
            key: raw.key.clone().unwrap_or_default(),
            value: raw.value.clone(),
            description: string_formatting(description_text(&raw.description)),
            disabled: raw.disabled,
        }
    }
}

/// A parsed request URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Url {
    /// The URL as typed in Postman.
    pub raw: Option<String>,
    /// Scheme without `://`.
    pub protocol: Option<String>,
    /// Host labels.
    pub host: Vec<String>,
    /// Path segments, as typed (`:id`, `{{id}}`, literals).
    pub path: Vec<String>,
    /// Port.
    pub port: Option<String>,
    /// Query parameters.
    pub query: Vec<QueryParam>,
    /// Fragment.
    pub hash: Option<String>,
}

impl Url {
    /// Parses a raw string or structured URL.
    ///
    /// Structured fields win over what can be derived from `raw`; the raw string
    /// only fills in parts the object leaves empty.
    pub fn parse(data: &RawUrl) -> Self {
        match data {
            RawUrl::Text(raw) => Self::from_raw_string(raw),
            RawUrl::Structured(obj) => Self::from_object(obj),
        }
    }

    /// Parses a raw URL string such as `https://api.example.com/v1/users?page=1`.
    pub fn from_raw_string(raw: &str) -> Self {
        let (without_hash, hash) = match raw.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_string())),
            None => (raw, None),
        };
        let (without_query, query_str) = match without_hash.split_once('?') {
            Some((head, q)) => (head, Some(q)),
            None => (without_hash, None),
        };

        let (protocol, rest) = match without_query.split_once("://") {
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, without_query),
        };

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path.split('/').map(str::to_string).collect()),
            None => (rest, Vec::new()),
        };

        let (host_part, port) = split_port(authority);
        let host = if host_part.is_empty() {
            Vec::new()
        } else {
            host_part.split('.').map(str::to_string).collect()
        };

        let query = query_str.map(parse_query_string).unwrap_or_default();

        Self {
            raw: Some(raw.to_string()),
            protocol,
            host,
            path,
            port,
            query,
            hash,
        }
    }

    fn from_object(obj: &RawUrlObject) -> Self {
        let derived = obj
            .raw
            .as_deref()
            .map(Self::from_raw_string)
            .unwrap_or_default();

        let host = obj
            .host
            .as_ref()
            .map(|h| h.segments('.'))
            .filter(|h| !h.is_empty())
            .unwrap_or(derived.host);
        let path = obj
            .path
            .as_ref()
            .map(|p| p.segments('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(derived.path);
        let port = obj
            .port
            .as_ref()
            .and_then(|p| match p {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .or(derived.port);
        let query = if obj.query.is_empty() {
            derived.query
        } else {
            obj.query.iter().map(QueryParam::from_raw).collect()
        };

        Self {
            raw: obj.raw.clone(),
            protocol: obj.protocol.clone().filter(|p| !p.is_empty()).or(derived.protocol),
            host,
            path,
            port,
            query,
            hash: obj.hash.clone().or(derived.hash),
        }
    }

    /// True when the raw URL is nothing but one unresolved `{variable}`.
    ///
    /// Such a URL cannot be turned into a concrete path.
    pub fn is_template_only(raw: &str) -> bool {
        static TEMPLATE_ONLY_RE: OnceLock<Regex> = OnceLock::new();
        let re = TEMPLATE_ONLY_RE
            .get_or_init(|| Regex::new(r"^\{[^{}]+\}$").expect("Invalid regex"));
        re.is_match(raw)
    }

    /// The OpenAPI path template, e.g. `/devices/{device_id}`.
    ///
    /// `:name` segments become `{name}` and `{{name}}` collapses to `{name}`.
    pub fn path_string(&self) -> String {
        let segments: Vec<String> = self.path.iter().map(|s| normalize_segment(s)).collect();
        format!("/{}", segments.join("/"))
    }

    /// One required string `in: path` parameter per templated segment.
    pub fn path_parameters(&self) -> Vec<Value> {
        self.path
            .iter()
            .filter_map(|segment| path_parameter_name(&normalize_segment(segment)))
            .map(|name| {
                json!({
                    "name": name,
                    "in": "path",
                    "required": true,
                    "schema": {"type": "string"}
                })
            })
            .collect()
    }

    /// `protocol://host[:port]`, or an empty string when no host is recoverable.
    pub fn base_url(&self) -> String {
        let host = self.host.join(".");
        if host.is_empty() {
            return String::new();
        }

        let mut base = match &self.protocol {
            Some(protocol) => format!("{}://{}", protocol, host),
            None => host,
        };
        if let Some(port) = &self.port {
            base.push(':');
            base.push_str(port);
        }
        base
    }
}

/// Collapses `{{var}}` to `{var}` and rewrites `:var` as `{var}`.
pub(crate) fn collapse_braces(text: &str) -> String {
    text.replace("{{", "{").replace("}}", "}")
}

fn normalize_segment(segment: &str) -> String {
    let collapsed = collapse_braces(segment);
    match collapsed.strip_prefix(':') {
        Some(name) if !name.is_empty() => format!("{{{}}}", name),
        _ => collapsed,
    }
}

fn path_parameter_name(segment: &str) -> Option<String> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    if name.is_empty() || name.contains(['{', '}']) {
        return None;
    }
    Some(name.to_string())
}

fn split_port(authority: &str) -> (&str, Option<String>) {
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
            (host, Some(port.to_string()))
        }
        _ => (authority, None),
    }
}

fn parse_query_string(query: &str) -> Vec<QueryParam> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, Some(v.to_string())),
                None => (pair, None),
            };
            QueryParam {
                key: key.to_string(),
                value,
                description: String::new(),
                disabled: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn structured(json: &str) -> Url {
        let raw: RawUrl = serde_json::from_str(json).unwrap();
        Url::parse(&raw)
    }

    #[test]
    fn test_parse_raw_string() {
        let url = Url::from_raw_string("https://api.example.com:8443/v1/devices?limit=10#top");
        assert_eq!(url.protocol.as_deref(), Some("https"));
        assert_eq!(url.host, vec!["api", "example", "com"]);
        assert_eq!(url.port.as_deref(), Some("8443"));
        assert_eq!(url.path, vec!["v1", "devices"]);
        assert_eq!(url.query.len(), 1);
        assert_eq!(url.query[0].key, "limit");
        assert_eq!(url.query[0].value.as_deref(), Some("10"));
        assert_eq!(url.hash.as_deref(), Some("top"));
        assert_eq!(url.base_url(), "https://api.example.com:8443");
    }

    #[test]
    fn test_parse_raw_without_scheme() {
        let url = Url::from_raw_string("{{base_url}}/devices/:id");
        assert_eq!(url.protocol, None);
        assert_eq!(url.host, vec!["{{base_url}}"]);
        assert_eq!(url.path_string(), "/devices/{id}");
        assert_eq!(url.base_url(), "{{base_url}}");
    }

    #[test]
    fn test_structured_fields_take_precedence() {
        let url = structured(
            r#"{
                "raw": "https://old.example.com/legacy",
                "protocol": "https",
                "host": ["{{subdomain}}", "api", "example", "io"],
                "path": ["api", "v1", "blueprints", ":blueprint_id"],
                "query": [{"key": "limit", "value": "300", "description": {"content": "<p>Max results</p>"}}]
            }"#,
        );
        assert_eq!(url.base_url(), "https://{{subdomain}}.api.example.io");
        assert_eq!(url.path_string(), "/api/v1/blueprints/{blueprint_id}");
        assert_eq!(url.query[0].description, "Max results");
    }

    #[test]
    fn test_structured_falls_back_to_raw() {
        let url = structured(r#"{"raw": "http://localhost:8080/health"}"#);
        assert_eq!(url.path_string(), "/health");
        assert_eq!(url.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_path_string_normalizes_both_styles() {
        let colon = Url {
            path: vec!["users".into(), ":user_id".into()],
            ..Default::default()
        };
        let braces = Url {
            path: vec!["users".into(), "{user_id}".into()],
            ..Default::default()
        };
        let doubled = Url {
            path: vec!["users".into(), "{{user_id}}".into()],
            ..Default::default()
        };
        assert_eq!(colon.path_string(), "/users/{user_id}");
        assert_eq!(colon.path_string(), braces.path_string());
        assert_eq!(colon.path_string(), doubled.path_string());
        assert_eq!(colon.path_parameters(), braces.path_parameters());
    }

    #[test]
    fn test_path_parameters() {
        let url = Url::from_raw_string("https://api.example.com/devices/:device_id/apps/{app_id}");
        let params = url.path_parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[0],
            json!({"name": "device_id", "in": "path", "required": true, "schema": {"type": "string"}})
        );
        assert_eq!(params[1]["name"], "app_id");
    }

    #[test]
    fn test_empty_path_is_root() {
        let url = Url::from_raw_string("https://api.example.com");
        assert_eq!(url.path_string(), "/");
        assert!(url.path_parameters().is_empty());
    }

    #[test]
    fn test_base_url_degenerate_scheme_only() {
        let url = Url::from_raw_string("https://");
        assert_eq!(url.base_url(), "");
        assert_eq!(Url::default().base_url(), "");
    }

    #[test]
    fn test_template_only() {
        assert!(Url::is_template_only("{device_url}"));
        assert!(!Url::is_template_only("{{base_url}}"));
        assert!(!Url::is_template_only("{base}/devices"));
        assert!(!Url::is_template_only("https://example.com"));
    }
}
