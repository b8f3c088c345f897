//! # Reference Resolver
//!
//! Hoists inline parameters, request bodies, responses, response headers and
//! media-type schemas of every operation into `components` and replaces them
//! with `$ref` pointers.
//!
//! Naming:
//! - schemas use their `title`, or `Schema{N}` where `N` numbers distinct
//!   schema structures in encounter order;
//! - parameters and headers use their own name;
//! - request bodies use `{summary}_RequestBody`, responses
//!   `{summary}_{status}_Response`.
//!
//! Spaces in names become underscores. When a name is taken, an identical
//! component is reused (except for request bodies, which never compare
//! content); otherwise `{name}_1`, `{name}_2`, ... are probed.
//!
//! Objects that already are `$ref`s are left alone, so resolving a resolved
//! document changes nothing.

use crate::oas::ref_utils::{component_ref_value, is_reference};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// The component sections the resolver writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `components/schemas`
    Schema,
    /// `components/parameters`
    Parameter,
    /// `components/requestBodies`
    RequestBody,
    /// `components/responses`
    Response,
    /// `components/headers`
    Header,
}

impl ComponentKind {
    const ALL: [ComponentKind; 5] = [
        Self::Schema,
        Self::Parameter,
        Self::RequestBody,
        Self::Response,
        Self::Header,
    ];

    /// Key under `components`.
    pub fn section(self) -> &'static str {
        match self {
            Self::Schema => "schemas",
            Self::Parameter => "parameters",
            Self::RequestBody => "requestBodies",
            Self::Response => "responses",
            Self::Header => "headers",
        }
    }

    /// Whether an existing component with the same name and content is reused.
    pub fn reuses_equal_content(self) -> bool {
        !matches!(self, Self::RequestBody)
    }
}

/// Stateful resolver for one document.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    components: Map<String, Value>,
    sections: IndexMap<&'static str, Map<String, Value>>,
    seen_schemas: HashMap<String, String>,
    registered: usize,
}

impl ReferenceResolver {
    /// Creates a resolver seeded with the document's existing components.
    pub fn for_document(document: &Value) -> Self {
        let components = document
            .get("components")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut sections = IndexMap::new();
        for kind in ComponentKind::ALL {
            if let Some(Value::Object(existing)) = components.get(kind.section()) {
                sections.insert(kind.section(), existing.clone());
            }
        }

        Self {
            components,
            sections,
            ..Self::default()
        }
    }

    /// Returns a resolved copy of `document`. The input is not modified.
    pub fn resolve(mut self, document: &Value) -> Value {
        let mut doc = document.clone();
        let Some(root) = doc.as_object_mut() else {
            return document.clone();
        };

        if let Some(Value::Object(paths)) = root.get_mut("paths") {
            for path_item in paths.values_mut() {
                let Value::Object(path_item) = path_item else {
                    continue;
                };
                for (method, operation) in path_item.iter_mut() {
                    if HTTP_METHODS.contains(&method.as_str()) {
                        self.resolve_operation(operation);
                    }
                }
            }
        }

        for (section, entries) in std::mem::take(&mut self.sections) {
            self.components.insert(section.to_string(), Value::Object(entries));
        }
        if !self.components.is_empty() {
            root.insert("components".to_string(), Value::Object(self.components));
        }

        info!(registered = self.registered, "Resolved component references");
        doc
    }

    fn resolve_operation(&mut self, operation: &mut Value) {
        let summary = operation
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if let Some(Value::Array(parameters)) = operation.get_mut("parameters") {
            for parameter in parameters.iter_mut().filter(|p| !is_reference(p)) {
                let name = parameter
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("parameter")
                    .to_string();
                self.hoist(ComponentKind::Parameter, &name, parameter);
            }
        }

        if let Some(body) = operation.get_mut("requestBody").filter(|b| !is_reference(b)) {
            self.resolve_content(body);
            self.hoist(ComponentKind::RequestBody, &format!("{}_RequestBody", summary), body);
        }

        if let Some(Value::Object(responses)) = operation.get_mut("responses") {
            for (status, response) in responses.iter_mut() {
                if is_reference(response) {
                    continue;
                }
                self.resolve_content(response);
                self.resolve_headers(response);
                let name = format!("{}_{}_Response", summary, status);
                self.hoist(ComponentKind::Response, &name, response);
            }
        }
    }

    fn resolve_content(&mut self, holder: &mut Value) {
        let Some(Value::Object(content)) = holder.get_mut("content") else {
            return;
        };
        for media in content.values_mut() {
            if let Some(schema) = media.get_mut("schema").filter(|s| !is_reference(s)) {
                let inline = std::mem::take(schema);
                *schema = self.schema_ref(inline);
            }
        }
    }

    fn resolve_headers(&mut self, response: &mut Value) {
        let Some(Value::Object(headers)) = response.get_mut("headers") else {
            return;
        };
        for (name, header) in headers.iter_mut() {
            if !is_reference(header) {
                self.hoist(ComponentKind::Header, name, header);
            }
        }
    }

    fn schema_ref(&mut self, schema: Value) -> Value {
        if let Some(title) = schema.get("title").and_then(Value::as_str) {
            let title = title.to_string();
            let name = self.register(ComponentKind::Schema, &title, schema);
            return component_ref_value(ComponentKind::Schema.section(), &name);
        }

        let key = schema.to_string();
        if let Some(name) = self.seen_schemas.get(&key) {
            return component_ref_value(ComponentKind::Schema.section(), name);
        }

        let base = format!("Schema{}", self.seen_schemas.len() + 1);
        let name = self.register(ComponentKind::Schema, &base, schema);
        self.seen_schemas.insert(key, name.clone());
        component_ref_value(ComponentKind::Schema.section(), &name)
    }

    /// Registers `*slot` and replaces it with a reference.
    fn hoist(&mut self, kind: ComponentKind, base_name: &str, slot: &mut Value) {
        let inline = std::mem::take(slot);
        let name = self.register(kind, base_name, inline);
        *slot = component_ref_value(kind.section(), &name);
    }

    /// Stores `value` under a free name derived from `base_name` and returns
    /// that name, or the name of an identical existing component.
    fn register(&mut self, kind: ComponentKind, base_name: &str, value: Value) -> String {
        let base = base_name.replace(' ', "_");
        let section = self.sections.entry(kind.section()).or_default();

        let mut candidate = base.clone();
        let mut suffix = 0;
        loop {
            let reusable = section
                .get(&candidate)
                .map(|existing| kind.reuses_equal_content() && *existing == value);
            match reusable {
                None => {
                    debug!(section = kind.section(), name = %candidate, "Registered component");
                    section.insert(candidate.clone(), value);
                    self.registered += 1;
                    return candidate;
                }
                Some(true) => return candidate,
                Some(false) => {
                    suffix += 1;
                    candidate = format!("{}_{}", base, suffix);
                }
            }
        }
    }
}

/// Returns a copy of `document` with repeated inline objects moved into
/// `components`.
pub fn resolve_references(document: &Value) -> Value {
    ReferenceResolver::for_document(document).resolve(document)
}
