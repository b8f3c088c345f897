//! # Request Model
//!
//! One HTTP operation. Composes the URL, body, auth and response models into
//! a single OpenAPI Operation Object.

use crate::oas::document::external_docs_value;
use crate::postman::auth::Auth;
use crate::postman::body::RequestBody;
use crate::postman::response::Response;
use crate::postman::url::Url;
use crate::postman::wire::{description_text, RawKeyValue, RawRequest, RawResponse};
use crate::strings::{string_formatting, to_camel_case};
use serde_json::{json, Map, Value};

/// A request attached to a leaf item.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method, upper case.
    pub method: String,
    /// Parsed URL.
    pub url: Url,
    /// Operation summary (the item's display name).
    pub summary: String,
    /// Request headers.
    pub headers: Vec<RawKeyValue>,
    /// Request body.
    pub body: Option<RequestBody>,
    /// Cleaned description.
    pub description: String,
    /// Auth applying to this request.
    pub auth: Option<Auth>,
    /// Nearest folder name; empty at the top level.
    pub tag: String,
    /// Documentation anchor for this request.
    pub external_docs: Option<String>,
    /// Recorded example responses, in document order.
    pub responses: Vec<Response>,
}

impl Request {
    /// Builds a request from its wire form.
    ///
    /// `urlObject` wins over `url`; a bare string request is a `GET`.
    pub fn from_raw(raw: &RawRequest, summary: &str, responses: &[RawResponse]) -> Self {
        let responses = responses.iter().map(Response::from_raw).collect();

        match raw {
            RawRequest::Url(url) => Self {
                method: "GET".to_string(),
                url: Url::from_raw_string(url),
                summary: summary.to_string(),
                headers: Vec::new(),
                body: None,
                description: String::new(),
                auth: None,
                tag: String::new(),
                external_docs: None,
                responses,
            },
            RawRequest::Full(obj) => Self {
                method: obj
                    .method
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("GET")
                    .to_ascii_uppercase(),
                url: obj
                    .url_object
                    .as_ref()
                    .or(obj.url.as_ref())
                    .map(Url::parse)
                    .unwrap_or_default(),
                summary: summary.to_string(),
                headers: obj.header.clone(),
                body: obj.body.as_ref().and_then(RequestBody::parse),
                description: string_formatting(description_text(&obj.description)),
                auth: obj.auth.as_ref().and_then(Auth::parse),
                tag: String::new(),
                external_docs: None,
                responses,
            },
        }
    }

    /// Sets the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Sets the documentation anchor.
    pub fn with_external_docs(mut self, url: Option<String>) -> Self {
        self.external_docs = url;
        self
    }

    /// Uses `auth` when the request declares none of its own.
    pub fn with_fallback_auth(mut self, auth: Option<Auth>) -> Self {
        if self.auth.is_none() {
            self.auth = auth;
        }
        self
    }

    /// The OpenAPI path template for this request.
    pub fn path(&self) -> String {
        self.url.path_string()
    }

    /// Lower-case method key used in a Path Item.
    pub fn method_key(&self) -> String {
        self.method.to_ascii_lowercase()
    }

    /// The server base URL of this request.
    pub fn host(&self) -> String {
        self.url.base_url()
    }

    /// `{camel(tag)}_{camel(summary)}`, or just `camel(summary)` without a tag.
    pub fn operation_id(&self) -> String {
        let tag = to_camel_case(&self.tag);
        let summary = to_camel_case(&self.summary);
        if tag.is_empty() {
            summary
        } else {
            format!("{}_{}", tag, summary)
        }
    }

    /// Path, then query, then header parameters.
    pub fn parameters(&self) -> Vec<Value> {
        let mut parameters = self.url.path_parameters();

        for query in self.url.query.iter().filter(|q| !q.disabled && !q.key.is_empty()) {
            parameters.push(parameter(
                &query.key,
                "query",
                &query.description,
                !query.disabled,
                query.value.as_deref(),
            ));
        }

        for header in self.headers.iter().filter(|h| !h.disabled) {
            let Some(key) = header.key.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };
            let description = string_formatting(description_text(&header.description));
            parameters.push(parameter(key, "header", &description, true, header.value.as_deref()));
        }

        parameters
    }

    /// The Responses Object. Later responses with the same status win; no
    /// recorded responses yield a single `204 No Content`.
    pub fn responses(&self) -> Map<String, Value> {
        let mut responses = Map::new();
        for response in &self.responses {
            let (status, object) = response.to_openapi();
            responses.insert(status, object);
        }

        if responses.is_empty() {
            responses.insert("204".to_string(), json!({"description": "No Content"}));
        }
        responses
    }

    /// Builds the Operation Object.
    pub fn to_operation(&self) -> Value {
        let mut op = Map::new();

        if !self.tag.is_empty() {
            op.insert("tags".to_string(), json!([self.tag]));
        }
        op.insert("summary".to_string(), json!(self.summary));
        if !self.description.is_empty() {
            op.insert("description".to_string(), json!(self.description));
        }
        if let Some(url) = &self.external_docs {
            op.insert("externalDocs".to_string(), external_docs_value(url));
        }
        op.insert("operationId".to_string(), json!(self.operation_id()));

        let parameters = self.parameters();
        if !parameters.is_empty() {
            op.insert("parameters".to_string(), Value::Array(parameters));
        }
        if let Some(body) = self.body.as_ref().and_then(RequestBody::to_openapi) {
            op.insert("requestBody".to_string(), body);
        }
        op.insert("responses".to_string(), Value::Object(self.responses()));

        if let Some(auth) = &self.auth {
            op.insert("security".to_string(), auth.security_requirement());
        }

        Value::Object(op)
    }

    /// `{method: operation}` for merging into a Path Item.
    pub fn to_openapi(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(self.method_key(), self.to_operation());
        out
    }
}

fn parameter(name: &str, location: &str, description: &str, required: bool, example: Option<&str>) -> Value {
    let mut param = Map::new();
    param.insert("name".to_string(), json!(name));
    param.insert("in".to_string(), json!(location));
    if !description.is_empty() {
        param.insert("description".to_string(), json!(description));
    }
    param.insert("required".to_string(), json!(required));
    param.insert("schema".to_string(), json!({"type": "string"}));
    if let Some(example) = example {
        param.insert("example".to_string(), json!(example));
    }
    Value::Object(param)
}
