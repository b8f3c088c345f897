//! # Document Metadata
//!
//! Typed builders for the top-level pieces of the generated OpenAPI document
//! (`info`, `servers`, `tags`, `externalDocs`). Each renders to the JSON shape
//! expected by OpenAPI 3.1, omitting unset optional fields.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// The OpenAPI version emitted in the `openapi` field.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Minimal OpenAPI Info metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiInfo {
    /// The title of the API.
    pub title: String,
    /// The version of the API document.
    pub version: String,
    /// Optional description for the API.
    pub description: Option<String>,
    /// Optional contact information.
    pub contact: Option<OpenApiContact>,
    /// Optional license information.
    pub license: Option<OpenApiLicense>,
}

impl OpenApiInfo {
    /// Creates a new OpenApiInfo with required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            contact: None,
            license: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the contact.
    pub fn with_contact(mut self, contact: OpenApiContact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets the license.
    pub fn with_license(mut self, license: OpenApiLicense) -> Self {
        self.license = Some(license);
        self
    }

    /// Renders the Info Object.
    pub fn to_value(&self) -> Value {
        let mut info_obj = Map::new();
        info_obj.insert("title".to_string(), json!(self.title));
        info_obj.insert("version".to_string(), json!(self.version));
        if let Some(desc) = &self.description {
            info_obj.insert("description".to_string(), json!(desc));
        }
        if let Some(contact) = &self.contact {
            let contact_obj = contact.to_value();
            if contact_obj.as_object().is_some_and(|c| !c.is_empty()) {
                info_obj.insert("contact".to_string(), contact_obj);
            }
        }
        if let Some(license) = &self.license {
            info_obj.insert("license".to_string(), license.to_value());
        }
        Value::Object(info_obj)
    }
}

/// Contact metadata for the OpenAPI `info` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenApiContact {
    /// Contact name.
    pub name: Option<String>,
    /// Contact URL.
    pub url: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl OpenApiContact {
    /// Creates an empty contact.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the contact name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the contact URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.email.is_none()
    }

    fn to_value(&self) -> Value {
        let mut contact_obj = Map::new();
        if let Some(name) = &self.name {
            contact_obj.insert("name".to_string(), json!(name));
        }
        if let Some(url) = &self.url {
            contact_obj.insert("url".to_string(), json!(url));
        }
        if let Some(email) = &self.email {
            contact_obj.insert("email".to_string(), json!(email));
        }
        Value::Object(contact_obj)
    }
}

/// License metadata for the OpenAPI `info` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiLicense {
    /// License name.
    pub name: String,
    /// SPDX license identifier.
    pub identifier: Option<String>,
    /// License URL.
    pub url: Option<String>,
}

impl OpenApiLicense {
    /// Creates a license with the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            url: None,
        }
    }

    /// Sets the SPDX identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the license URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut license_obj = Map::new();
        license_obj.insert("name".to_string(), json!(self.name));
        // `identifier` and `url` are mutually exclusive in 3.1
        if let Some(identifier) = &self.identifier {
            license_obj.insert("identifier".to_string(), json!(identifier));
        } else if let Some(url) = &self.url {
            license_obj.insert("url".to_string(), json!(url));
        }
        Value::Object(license_obj)
    }
}

/// Server metadata for OpenAPI `servers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiServer {
    /// Server URL, possibly templated with `{name}` variables.
    pub url: String,
    /// Variable definitions for server URL templating.
    pub variables: BTreeMap<String, OpenApiServerVariable>,
}

impl OpenApiServer {
    /// Creates a new server with the required URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Adds a server variable definition.
    pub fn with_variable(mut self, name: impl Into<String>, variable: OpenApiServerVariable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    /// Renders the Server Object.
    pub fn to_value(&self) -> Value {
        let mut server_obj = Map::new();
        server_obj.insert("url".to_string(), json!(self.url));
        if !self.variables.is_empty() {
            let vars: Map<String, Value> = self
                .variables
                .iter()
                .map(|(name, var)| (name.clone(), var.to_value()))
                .collect();
            server_obj.insert("variables".to_string(), Value::Object(vars));
        }
        Value::Object(server_obj)
    }
}

/// Server variable metadata for templated server URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiServerVariable {
    /// Default value for substitution.
    pub default: String,
}

impl OpenApiServerVariable {
    /// Creates a new server variable with the required default.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!({ "default": self.default })
    }
}

/// Tag metadata for the OpenAPI `tags` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiTag {
    /// The tag name.
    pub name: String,
    /// A longer description of the tag.
    pub description: Option<String>,
    /// Optional external documentation URL for the tag.
    pub external_docs: Option<String>,
}

impl OpenApiTag {
    /// Creates a new tag with the required name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            external_docs: None,
        }
    }

    /// Sets the tag description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the tag external documentation URL.
    pub fn with_external_docs(mut self, url: impl Into<String>) -> Self {
        self.external_docs = Some(url.into());
        self
    }

    /// Renders the Tag Object.
    pub fn to_value(&self) -> Value {
        let mut tag_obj = Map::new();
        tag_obj.insert("name".to_string(), json!(self.name));
        if let Some(desc) = &self.description {
            tag_obj.insert("description".to_string(), json!(desc));
        }
        if let Some(url) = &self.external_docs {
            tag_obj.insert("externalDocs".to_string(), external_docs_value(url));
        }
        Value::Object(tag_obj)
    }
}

/// Renders an External Documentation Object.
pub fn external_docs_value(url: &str) -> Value {
    json!({ "url": url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_info_omits_unset_fields() {
        let info = OpenApiInfo::new("Example API", "1.0.0");
        assert_eq!(
            info.to_value(),
            json!({"title": "Example API", "version": "1.0.0"})
        );
    }

    #[test]
    fn test_info_with_contact_and_license() {
        let info = OpenApiInfo::new("Example API", "2.0.0")
            .with_description("Device management")
            .with_contact(OpenApiContact::new().with_name("API Team").with_email("api@example.com"))
            .with_license(OpenApiLicense::new("MIT License").with_identifier("MIT").with_url("ignored"));
        assert_eq!(
            info.to_value(),
            json!({
                "title": "Example API",
                "version": "2.0.0",
                "description": "Device management",
                "contact": {"name": "API Team", "email": "api@example.com"},
                "license": {"name": "MIT License", "identifier": "MIT"}
            })
        );
    }

    #[test]
    fn test_empty_contact_is_skipped() {
        let info = OpenApiInfo::new("T", "1").with_contact(OpenApiContact::new());
        assert!(info.to_value().get("contact").is_none());
    }

    #[test]
    fn test_server_with_variables() {
        let server = OpenApiServer::new("https://{subdomain}.api.example.io")
            .with_variable("subdomain", OpenApiServerVariable::new("<subdomain>"));
        assert_eq!(
            server.to_value(),
            json!({
                "url": "https://{subdomain}.api.example.io",
                "variables": {"subdomain": {"default": "<subdomain>"}}
            })
        );
    }

    #[test]
    fn test_tag_with_docs() {
        let tag = OpenApiTag::new("Devices")
            .with_description("Device endpoints")
            .with_external_docs("https://docs.example.io/#abc");
        assert_eq!(
            tag.to_value(),
            json!({
                "name": "Devices",
                "description": "Device endpoints",
                "externalDocs": {"url": "https://docs.example.io/#abc"}
            })
        );
    }
}
