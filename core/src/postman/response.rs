//! # Response Model
//!
//! One recorded example response and its OpenAPI Response Object.

use crate::oas::inference::{repair_json_text, response_body_schema};
use crate::postman::wire::{description_text, RawKeyValue, RawResponse};
use crate::strings::string_formatting;
use serde_json::{json, Map, Value};
use tracing::warn;

/// A recorded example response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Postman response id.
    pub id: Option<String>,
    /// Example name.
    pub name: Option<String>,
    /// HTTP status code.
    pub status_code: u16,
    /// Status text, used as the response description.
    pub status_text: String,
    /// Recorded headers.
    pub headers: Vec<RawKeyValue>,
    /// Body text.
    pub body: Option<String>,
    /// Recorded cookies.
    pub cookies: Vec<Value>,
    /// Response time in milliseconds.
    pub time_ms: Option<u64>,
    /// Recording timestamp.
    pub timestamp: Option<String>,
}

impl Response {
    /// Builds a response from its wire form, defaulting to `200 OK`.
    pub fn from_raw(raw: &RawResponse) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            status_code: raw.code.unwrap_or(200),
            status_text: raw
                .status
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "OK".to_string()),
            headers: raw.header.clone(),
            body: raw.body.clone(),
            cookies: raw.cookie.clone(),
            time_ms: raw.response_time.as_ref().and_then(|t| match t {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            }),
            timestamp: raw.timestamp.clone(),
        }
    }

    /// The `Content-Type` header value, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| {
                h.key
                    .as_deref()
                    .is_some_and(|k| k.eq_ignore_ascii_case("content-type"))
            })
            .and_then(|h| h.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// `(status code, Response Object)`.
    pub fn to_openapi(&self) -> (String, Value) {
        let mut response = Map::new();
        response.insert("description".to_string(), json!(self.status_text));

        if let (Some(content_type), Some(body)) = (self.content_type(), self.body.as_deref()) {
            if !body.is_empty() {
                let mut content = Map::new();
                content.insert(content_type.to_string(), self.media_type(content_type, body));
                response.insert("content".to_string(), Value::Object(content));
            }
        }

        let headers = self.header_objects();
        if !headers.is_empty() {
            response.insert("headers".to_string(), Value::Object(headers));
        }

        (self.status_code.to_string(), Value::Object(response))
    }

    fn media_type(&self, content_type: &str, body: &str) -> Value {
        if !content_type.to_ascii_lowercase().contains("json") {
            return json!({"schema": {"type": "string"}, "example": string_formatting(body)});
        }

        let repaired = repair_json_text(body);
        match serde_json::from_str::<Value>(&repaired) {
            Ok(example) => json!({"schema": response_body_schema(&example), "example": example}),
            Err(e) => {
                warn!(
                    status = self.status_code,
                    name = self.name.as_deref().unwrap_or(""),
                    error = %e,
                    "Response example is not valid JSON, keeping repaired text"
                );
                json!({"schema": {"type": "string"}, "example": repaired})
            }
        }
    }

    fn header_objects(&self) -> Map<String, Value> {
        let mut headers = Map::new();
        for header in &self.headers {
            let Some(key) = header.key.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };

            let mut object = Map::new();
            object.insert("schema".to_string(), json!({"type": "string"}));
            let description = string_formatting(description_text(&header.description));
            if !description.is_empty() {
                object.insert("description".to_string(), json!(description));
            }
            if let Some(value) = header.value.as_deref().filter(|v| !v.is_empty()) {
                object.insert("example".to_string(), json!(value));
            }
            headers.insert(key.to_string(), Value::Object(object));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(json: &str) -> Response {
        let raw: RawResponse = serde_json::from_str(json).unwrap();
        Response::from_raw(&raw)
    }

    #[test]
    fn test_defaults() {
        let r = response("{}");
        assert_eq!(r.status_code, 200);
        assert_eq!(r.status_text, "OK");
        assert_eq!(r.to_openapi(), ("200".to_string(), json!({"description": "OK"})));
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let r = response(r#"{"header": [{"key": "CONTENT-TYPE", "value": "application/json"}]}"#);
        assert_eq!(r.content_type(), Some("application/json"));
    }

    #[test]
    fn test_json_body_infers_schema() {
        let r = response(
            r#"{
                "code": 200, "status": "OK",
                "header": [{"key": "Content-Type", "value": "application/json"}],
                "body": "{\"id\": 1, \"name\": \"x\"}"
            }"#,
        );
        let (status, value) = r.to_openapi();
        assert_eq!(status, "200");
        assert_eq!(
            value,
            json!({
                "description": "OK",
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}}
                        },
                        "example": {"id": 1, "name": "x"}
                    }
                },
                "headers": {
                    "Content-Type": {"schema": {"type": "string"}, "example": "application/json"}
                }
            })
        );
    }

    #[test]
    fn test_json_body_with_comments_is_repaired() {
        let r = response(
            r#"{
                "header": [{"key": "Content-Type", "value": "application/json; charset=utf-8"}],
                "body": "{\n  \"total\": 2, // count\n  \"items\": [],\n}"
            }"#,
        );
        let (_, value) = r.to_openapi();
        let media = &value["content"]["application/json; charset=utf-8"];
        assert_eq!(media["example"], json!({"total": 2, "items": []}));
        assert_eq!(
            media["schema"],
            json!({"type": "object", "properties": {"total": {"type": "integer"}, "items": {}}})
        );
    }

    #[test]
    fn test_array_body_gets_bare_object_schema() {
        let r = response(
            r#"{"header": [{"key": "Content-Type", "value": "application/json"}], "body": "[{\"id\": 1}]"}"#,
        );
        let (_, value) = r.to_openapi();
        assert_eq!(value["content"]["application/json"]["schema"], json!({"type": "object"}));
        assert_eq!(value["content"]["application/json"]["example"], json!([{"id": 1}]));
    }

    #[test]
    fn test_unparseable_json_keeps_text() {
        let r = response(
            r#"{"header": [{"key": "Content-Type", "value": "application/json"}], "body": "{oops"}"#,
        );
        let (_, value) = r.to_openapi();
        assert_eq!(
            value["content"]["application/json"],
            json!({"schema": {"type": "string"}, "example": "{oops"})
        );
    }

    #[test]
    fn test_text_body() {
        let r = response(
            r#"{"code": 404, "status": "Not Found",
                "header": [{"key": "Content-Type", "value": "text/html"}, {"value": "orphan"}],
                "body": "<p>Missing</p>"}"#,
        );
        let (status, value) = r.to_openapi();
        assert_eq!(status, "404");
        assert_eq!(
            value,
            json!({
                "description": "Not Found",
                "content": {"text/html": {"schema": {"type": "string"}, "example": "Missing"}},
                "headers": {"Content-Type": {"schema": {"type": "string"}, "example": "text/html"}}
            })
        );
    }

    #[test]
    fn test_metadata_is_carried() {
        let r = response(
            r#"{"id": "r1", "name": "Success", "responseTime": 42, "cookie": [{"key": "sid"}], "timestamp": "2024-01-01T00:00:00Z"}"#,
        );
        assert_eq!(r.id.as_deref(), Some("r1"));
        assert_eq!(r.name.as_deref(), Some("Success"));
        assert_eq!(r.time_ms, Some(42));
        assert_eq!(r.cookies.len(), 1);
        assert_eq!(r.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}
