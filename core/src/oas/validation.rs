//! # OpenAPI Validation
//!
//! Structural checks for a generated OpenAPI 3.1 document.
//!
//! Unlike a parser, the validator does not stop at the first problem: every
//! check runs and contributes diagnostics to a [`ValidationReport`]. The
//! document is only read.
//!
//! Checks:
//! - `openapi` is a `3.1.x` version string; `info.title` / `info.version` are strings.
//! - At least one of `paths`, `components` or `webhooks` exists.
//! - Path keys start with `/` and every `{param}` has a required `in: path` parameter.
//! - Operations define responses; responses define a description.
//! - Local `$ref`s resolve; component keys match `^[a-zA-Z0-9._-]+$`.
//! - Tag names and `operationId`s are unique.
//! - Security requirements name declared schemes; server variables have defaults.
//! - `externalDocs.url` values are absolute URLs.

use crate::oas::ref_utils::{is_reference, resolve_local_ref};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

const COMPONENT_KEY_PATTERN: &str = r"^[a-zA-Z0-9._-]+$";
const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dotted location inside the document, e.g. `paths./users.get`.
    pub location: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Result of [`validate_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// True when no diagnostics were produced.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All diagnostics, in check order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            location: location.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "OpenAPI document is valid");
        }
        writeln!(f, "OpenAPI document has {} problem(s):", self.diagnostics.len())?;
        for (idx, diagnostic) in self.diagnostics.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", diagnostic)?;
        }
        Ok(())
    }
}

/// Runs every structural check against `document`.
pub fn validate_document(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = document.as_object() else {
        report.push("$", "OpenAPI document must be an object");
        return report;
    };

    validate_root(root, &mut report);
    validate_info(root, &mut report);
    validate_paths(document, root, &mut report);
    validate_component_keys(root, &mut report);
    validate_tags_unique(root, &mut report);
    validate_operation_ids_unique(root, &mut report);
    validate_security_requirements(root, &mut report);
    validate_servers(root, &mut report);
    validate_external_docs(root, &mut report);
    validate_local_refs(document, document, "$", &mut report);

    report
}

fn validate_root(root: &Map<String, Value>, report: &mut ValidationReport) {
    match root.get("openapi").and_then(Value::as_str) {
        Some(version) if version.starts_with("3.1.") => {}
        Some(version) => report.push("openapi", format!("Unsupported OpenAPI version '{}'", version)),
        None => report.push("openapi", "Missing required 'openapi' version string"),
    }

    // 3.1 requires at least one of components, paths, or webhooks.
    if !["paths", "components", "webhooks"].iter().any(|k| root.contains_key(*k)) {
        report.push(
            "$",
            "OpenAPI document must define at least one of 'components', 'paths', or 'webhooks'",
        );
    }
}

fn validate_info(root: &Map<String, Value>, report: &mut ValidationReport) {
    let Some(info) = root.get("info").and_then(Value::as_object) else {
        report.push("info", "OpenAPI document missing required 'info' object");
        return;
    };
    for field in ["title", "version"] {
        if !info.get(field).is_some_and(Value::is_string) {
            report.push(format!("info.{}", field), format!("Info.{} must be a string", field));
        }
    }
}

fn operations(root: &Map<String, Value>) -> Vec<(&str, &str, &Value)> {
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    paths
        .iter()
        .filter_map(|(path, item)| item.as_object().map(|item| (path, item)))
        .flat_map(|(path, item)| {
            item.iter()
                .filter(|(method, _)| HTTP_METHODS.contains(&method.as_str()))
                .map(move |(method, op)| (path.as_str(), method.as_str(), op))
        })
        .collect()
}

/// Follows a local `$ref`, returning the object itself when it is not one.
fn deref<'a>(document: &'a Value, value: &'a Value) -> Option<&'a Value> {
    match value.get("$ref").and_then(Value::as_str) {
        Some(reference) => resolve_local_ref(document, reference),
        None => Some(value),
    }
}

fn validate_paths(document: &Value, root: &Map<String, Value>, report: &mut ValidationReport) {
    static TEMPLATE_RE: OnceLock<Regex> = OnceLock::new();
    let template_re =
        TEMPLATE_RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"));

    if let Some(paths) = root.get("paths") {
        let Some(paths) = paths.as_object() else {
            report.push("paths", "'paths' must be an object");
            return;
        };
        for path in paths.keys().filter(|p| !p.starts_with('/')) {
            report.push(format!("paths.{}", path), "Path keys must start with '/'");
        }
    }

    for (path, method, operation) in operations(root) {
        let context = format!("paths.{}.{}", path, method);

        let path_level = root["paths"][path].get("parameters");
        let declared: HashSet<&str> = path_level
            .into_iter()
            .chain(operation.get("parameters"))
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(|p| deref(document, p))
            .filter(|p| {
                p.get("in").and_then(Value::as_str) == Some("path")
                    && p.get("required").and_then(Value::as_bool) == Some(true)
            })
            .filter_map(|p| p.get("name").and_then(Value::as_str))
            .collect();

        for cap in template_re.captures_iter(path) {
            let name = &cap[1];
            if !declared.contains(name) {
                report.push(
                    context.clone(),
                    format!("Path template parameter '{}' has no required 'in: path' parameter", name),
                );
            }
        }

        match operation.get("responses").and_then(Value::as_object) {
            Some(responses) if !responses.is_empty() => {
                for (status, response) in responses {
                    let has_description = deref(document, response)
                        .and_then(|r| r.get("description"))
                        .is_some_and(Value::is_string);
                    if !has_description {
                        report.push(
                            format!("{}.responses.{}", context, status),
                            "Response must define a description",
                        );
                    }
                }
            }
            _ => report.push(context, "Operation must define at least one response"),
        }
    }
}

fn validate_component_keys(root: &Map<String, Value>, report: &mut ValidationReport) {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_RE.get_or_init(|| Regex::new(COMPONENT_KEY_PATTERN).expect("Invalid regex"));

    let Some(components) = root.get("components").and_then(Value::as_object) else {
        return;
    };
    for (section, entries) in components {
        let Some(entries) = entries.as_object() else {
            continue;
        };
        for key in entries.keys().filter(|k| !re.is_match(k)) {
            report.push(
                format!("components.{}", section),
                format!("Component key '{}' must match {}", key, COMPONENT_KEY_PATTERN),
            );
        }
    }
}

fn validate_tags_unique(root: &Map<String, Value>, report: &mut ValidationReport) {
    let Some(tags) = root.get("tags").and_then(Value::as_array) else {
        return;
    };

    let mut seen = HashSet::new();
    for name in tags.iter().filter_map(|t| t.get("name").and_then(Value::as_str)) {
        if !seen.insert(name) {
            report.push("tags", format!("Duplicate tag name '{}' detected", name));
        }
    }
}

fn validate_operation_ids_unique(root: &Map<String, Value>, report: &mut ValidationReport) {
    let mut seen: HashMap<&str, String> = HashMap::new();
    for (path, method, operation) in operations(root) {
        let Some(id) = operation.get("operationId").and_then(Value::as_str) else {
            continue;
        };
        let location = format!("paths.{}.{}", path, method);
        if let Some(first) = seen.get(id) {
            report.push(
                location,
                format!("Duplicate operationId '{}' (first used at {})", id, first),
            );
        } else {
            seen.insert(id, location);
        }
    }
}

fn validate_security_requirements(root: &Map<String, Value>, report: &mut ValidationReport) {
    let declared: HashSet<&str> = root
        .get("components")
        .and_then(|c| c.get("securitySchemes"))
        .and_then(Value::as_object)
        .map(|schemes| schemes.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut check = |location: String, security: Option<&Value>| {
        let Some(requirements) = security else {
            return;
        };
        let Some(requirements) = requirements.as_array() else {
            report.push(location, "'security' must be an array");
            return;
        };
        for scheme in requirements.iter().filter_map(Value::as_object).flat_map(|r| r.keys()) {
            if !declared.contains(scheme.as_str()) {
                report.push(
                    location.clone(),
                    format!("Security requirement references undeclared scheme '{}'", scheme),
                );
            }
        }
    };

    check("security".to_string(), root.get("security"));
    for (path, method, operation) in operations(root) {
        check(format!("paths.{}.{}.security", path, method), operation.get("security"));
    }
}

fn validate_servers(root: &Map<String, Value>, report: &mut ValidationReport) {
    let Some(servers) = root.get("servers").and_then(Value::as_array) else {
        return;
    };
    for (idx, server) in servers.iter().enumerate() {
        let context = format!("servers[{}]", idx);
        if !server.get("url").is_some_and(Value::is_string) {
            report.push(context.clone(), "Server must define a 'url' string");
        }
        let Some(variables) = server.get("variables").and_then(Value::as_object) else {
            continue;
        };
        for (name, variable) in variables {
            if !variable.get("default").is_some_and(Value::is_string) {
                report.push(
                    format!("{}.variables.{}", context, name),
                    "Server variable must define a 'default' string",
                );
            }
        }
    }
}

fn validate_external_docs(root: &Map<String, Value>, report: &mut ValidationReport) {
    let mut check = |location: String, docs: Option<&Value>| {
        let Some(docs) = docs else {
            return;
        };
        match docs.get("url").and_then(Value::as_str) {
            Some(url) if Url::parse(url).is_ok() => {}
            Some(url) => report.push(location, format!("externalDocs.url '{}' is not a valid URL", url)),
            None => report.push(location, "externalDocs must define a 'url' string"),
        }
    };

    check("externalDocs".to_string(), root.get("externalDocs"));
    if let Some(tags) = root.get("tags").and_then(Value::as_array) {
        for (idx, tag) in tags.iter().enumerate() {
            check(format!("tags[{}].externalDocs", idx), tag.get("externalDocs"));
        }
    }
    for (path, method, operation) in operations(root) {
        check(format!("paths.{}.{}.externalDocs", path, method), operation.get("externalDocs"));
    }
}

fn validate_local_refs(document: &Value, value: &Value, location: &str, report: &mut ValidationReport) {
    match value {
        Value::Object(map) => {
            if is_reference(value) {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    if reference.starts_with('#') && resolve_local_ref(document, reference).is_none() {
                        report.push(location, format!("Unresolved reference '{}'", reference));
                    }
                }
            }
            for (key, child) in map {
                if key != "$ref" {
                    validate_local_refs(document, child, &format!("{}.{}", location, key), report);
                }
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                validate_local_refs(document, child, &format!("{}[{}]", location, idx), report);
            }
        }
        _ => {}
    }
}
