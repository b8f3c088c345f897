//! # Collection Model
//!
//! The root of a Postman collection. Flattens the item tree into the
//! top-level OpenAPI sections: servers, tags, paths and security schemes.

use crate::config::ConversionOptions;
use crate::error::{AppError, AppResult};
use crate::oas::document::{
    external_docs_value, OpenApiServer, OpenApiServerVariable, OpenApiTag, OPENAPI_VERSION,
};
use crate::postman::auth::Auth;
use crate::postman::info::Info;
use crate::postman::item::{build_children, Item};
use crate::postman::url::collapse_braces;
use crate::postman::wire::RawCollection;
use indexmap::IndexSet;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use tracing::{debug, info};

/// A parsed Postman collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collection metadata.
    pub info: Info,
    /// Collection-wide auth.
    pub auth: Option<Auth>,
    /// Top-level items in document order.
    pub items: Vec<Item>,
    /// Options the collection was built with.
    pub options: ConversionOptions,
}

impl Collection {
    /// Builds the model tree from the wire form.
    pub fn from_raw(raw: &RawCollection, options: &ConversionOptions) -> Self {
        let items = build_children(&raw.item, "", options);
        debug!(items = items.len(), "Built collection tree");
        Self {
            info: Info::from_raw(&raw.info),
            auth: raw.auth.as_ref().and_then(Auth::parse),
            items,
            options: options.clone(),
        }
    }

    /// Builds the model tree from parsed JSON.
    ///
    /// The document must be an object with an `info` object and, when present,
    /// an `item` array.
    pub fn from_value(value: &Value, options: &ConversionOptions) -> AppResult<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| AppError::InvalidShape("collection root must be an object".into()))?;

        match root.get("info") {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(AppError::InvalidShape("'info' must be an object".into())),
            None => return Err(AppError::InvalidShape("missing 'info'".into())),
        }

        if let Some(items) = root.get("item") {
            if !items.is_array() {
                return Err(AppError::InvalidShape("'item' must be an array".into()));
            }
        }

        let raw: RawCollection = serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidShape(e.to_string()))?;
        Ok(Self::from_raw(&raw, options))
    }

    fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Item)) {
        for item in &self.items {
            item.walk(&mut visit);
        }
    }

    /// Distinct non-empty request hosts, in first-seen order.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts = IndexSet::new();
        self.walk(|item| {
            let host = item.host();
            if !host.is_empty() {
                hosts.insert(host);
            }
        });
        hosts.into_iter().collect()
    }

    /// One server per distinct host. `{{var}}` placeholders become server
    /// variables defaulting to `<var>`.
    pub fn servers(&self) -> Vec<OpenApiServer> {
        static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
        let re = VARIABLE_RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"));

        let urls: IndexSet<String> = self.hosts().iter().map(|h| collapse_braces(h)).collect();
        urls.into_iter()
            .map(|url| {
                let variables: Vec<String> =
                    re.captures_iter(&url).map(|cap| cap[1].to_string()).collect();
                variables.into_iter().fold(OpenApiServer::new(&url), |server, name| {
                    let default = format!("<{}>", name);
                    server.with_variable(name, OpenApiServerVariable::new(default))
                })
            })
            .collect()
    }

    /// One tag per folder, depth first. Names are not deduplicated.
    pub fn tags(&self) -> Vec<OpenApiTag> {
        let mut tags = Vec::new();
        self.walk(|item| {
            if let Item::Folder(folder) = item {
                let mut tag = OpenApiTag::new(&folder.name);
                if !folder.description.is_empty() {
                    tag = tag.with_description(&folder.description);
                }
                if let Some(url) = &folder.docs_url {
                    tag = tag.with_external_docs(url);
                }
                tags.push(tag);
            }
        });
        tags
    }

    /// `path -> method -> operation`.
    ///
    /// Leaves sharing a path merge their method maps; a later leaf with the
    /// same path and method replaces the earlier operation.
    pub fn paths(&self) -> Map<String, Value> {
        let mut paths: Map<String, Value> = Map::new();
        self.walk(|item| {
            let Some((path, methods)) = item.to_openapi() else {
                return;
            };
            let entry = paths
                .entry(path)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(existing) = entry {
                for (method, operation) in methods {
                    existing.insert(method, operation);
                }
            }
        });
        paths
    }

    /// Every security scheme declared on the collection, items and requests.
    /// Later declarations replace earlier ones under the same scheme name.
    pub fn security_schemes(&self) -> Map<String, Value> {
        let mut schemes = Map::new();
        if let Some(auth) = &self.auth {
            schemes.extend(auth.to_security_scheme());
        }
        self.walk(|item| {
            if let Some(auth) = item.auth() {
                schemes.extend(auth.to_security_scheme());
            }
            if let Some(auth) = item.request().and_then(|r| r.auth.as_ref()) {
                schemes.extend(auth.to_security_scheme());
            }
        });
        schemes
    }

    /// Assembles the OpenAPI document. Never fails on a built tree.
    pub fn to_openapi(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("openapi".to_string(), json!(OPENAPI_VERSION));
        doc.insert("info".to_string(), self.info.to_openapi(&self.options).to_value());
        doc.insert(
            "servers".to_string(),
            Value::Array(self.servers().iter().map(OpenApiServer::to_value).collect()),
        );
        doc.insert(
            "tags".to_string(),
            Value::Array(self.tags().iter().map(OpenApiTag::to_value).collect()),
        );

        let paths = self.paths();
        let path_count = paths.len();
        doc.insert("paths".to_string(), Value::Object(paths));

        if let Some(auth) = &self.auth {
            doc.insert("security".to_string(), auth.security_requirement());
        }

        let schemes = self.security_schemes();
        if !schemes.is_empty() {
            doc.insert(
                "components".to_string(),
                json!({ "securitySchemes": Value::Object(schemes) }),
            );
        }

        if let Some(base) = &self.options.docs_base_url {
            doc.insert("externalDocs".to_string(), external_docs_value(base));
        }

        info!(title = %self.info.name, paths = path_count, "Assembled OpenAPI document");
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection(json: &str) -> Collection {
        let value: Value = serde_json::from_str(json).unwrap();
        Collection::from_value(&value, &ConversionOptions::new()).unwrap()
    }

    #[test]
    fn test_shape_errors() {
        let opts = ConversionOptions::new();
        let err = Collection::from_value(&json!([]), &opts).unwrap_err();
        assert!(matches!(err, AppError::InvalidShape(_)));
        let err = Collection::from_value(&json!({"item": []}), &opts).unwrap_err();
        assert!(matches!(err, AppError::InvalidShape(ref m) if m.contains("info")));
        let err = Collection::from_value(&json!({"info": {}, "item": {}}), &opts).unwrap_err();
        assert!(matches!(err, AppError::InvalidShape(ref m) if m.contains("item")));
    }

    #[test]
    fn test_servers_from_nested_hosts() {
        let c = collection(
            r#"{
                "info": {"name": "T"},
                "item": [
                    {"name": "A", "request": "https://{{subdomain}}.api.example.io/a"},
                    {"name": "F", "item": [
                        {"name": "G", "item": [
                            {"name": "B", "request": "https://{{subdomain}}.api.example.io/b"},
                            {"name": "C", "request": "http://localhost:8080/c"}
                        ]}
                    ]}
                ]
            }"#,
        );
        assert_eq!(
            c.hosts(),
            vec!["https://{{subdomain}}.api.example.io", "http://localhost:8080"]
        );
        let servers: Vec<Value> = c.servers().iter().map(OpenApiServer::to_value).collect();
        assert_eq!(
            servers,
            vec![
                json!({"url": "https://{subdomain}.api.example.io", "variables": {"subdomain": {"default": "<subdomain>"}}}),
                json!({"url": "http://localhost:8080"}),
            ]
        );
    }

    #[test]
    fn test_tags_depth_first() {
        let c = collection(
            r#"{
                "info": {"name": "T"},
                "item": [
                    {"name": "Devices", "description": "Device endpoints", "item": [
                        {"name": "Apps", "item": []}
                    ]},
                    {"name": "Ping", "request": "https://x.io/ping"},
                    {"name": "Users", "item": []}
                ]
            }"#,
        );
        let names: Vec<String> = c.tags().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Devices", "Apps", "Users"]);
        assert_eq!(c.tags()[0].description.as_deref(), Some("Device endpoints"));
    }

    #[test]
    fn test_method_merge_and_last_wins() {
        let c = collection(
            r#"{
                "info": {"name": "T"},
                "item": [
                    {"name": "First", "request": {"method": "GET", "url": "https://x.io/users/:id"}},
                    {"name": "Update", "request": {"method": "PUT", "url": "https://x.io/users/{id}"}},
                    {"name": "Second", "request": {"method": "GET", "url": "https://x.io/users/{{id}}"}}
                ]
            }"#,
        );
        let paths = c.paths();
        assert_eq!(paths.len(), 1);
        let methods = paths["/users/{id}"].as_object().unwrap();
        assert_eq!(methods.keys().collect::<Vec<_>>(), vec!["get", "put"]);
        assert_eq!(methods["get"]["summary"], "Second");
    }

    #[test]
    fn test_security_schemes_union() {
        let c = collection(
            r#"{
                "info": {"name": "T"},
                "auth": {"type": "bearer"},
                "item": [
                    {"name": "F", "auth": {"type": "basic"}, "item": [
                        {"name": "K", "request": {"method": "GET", "url": "https://x.io/k", "auth": {"type": "apikey"}}}
                    ]}
                ]
            }"#,
        );
        let schemes = c.security_schemes();
        assert_eq!(schemes.keys().collect::<Vec<_>>(), vec!["bearer", "basic", "apikeyauth"]);
    }

    #[test]
    fn test_document_sections() {
        let c = collection(r#"{"info": {"name": "T", "version": "2.0.0"}, "item": []}"#);
        assert_eq!(
            c.to_openapi(),
            json!({
                "openapi": "3.1.0",
                "info": {"title": "T", "version": "2.0.0"},
                "servers": [],
                "tags": [],
                "paths": {}
            })
        );
    }

    #[test]
    fn test_document_security_and_external_docs() {
        let value: Value = serde_json::from_str(
            r#"{"info": {"name": "T"}, "auth": {"type": "bearer"}, "item": []}"#,
        )
        .unwrap();
        let opts = ConversionOptions::new().with_docs_base_url("https://docs.x.io");
        let doc = Collection::from_value(&value, &opts).unwrap().to_openapi();
        assert_eq!(doc["security"], json!([{"bearer": []}]));
        assert_eq!(
            doc["components"]["securitySchemes"]["bearer"],
            json!({"type": "http", "scheme": "bearer", "bearerFormat": "API Token"})
        );
        assert_eq!(doc["externalDocs"], json!({"url": "https://docs.x.io"}));
    }
}
