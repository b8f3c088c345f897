//! # Conversion Options
//!
//! Run-level knobs that are not part of the collection itself.

use crate::oas::document::{OpenApiContact, OpenApiLicense};

/// Options controlling a single collection -> OpenAPI conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Base URL of the hosted API documentation.
    ///
    /// Items with an `id` link to `{docs_base_url}/#{id}` and the document gets a
    /// top-level `externalDocs`. No links are generated when unset.
    pub docs_base_url: Option<String>,
    /// Contact emitted under `info.contact`.
    pub contact: Option<OpenApiContact>,
    /// License emitted under `info.license`.
    pub license: Option<OpenApiLicense>,
    /// Whether repeated inline objects are hoisted into `components`.
    pub resolve_references: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            docs_base_url: None,
            contact: None,
            license: None,
            resolve_references: true,
        }
    }
}

impl ConversionOptions {
    /// Creates the default options (references resolved, no docs links).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the documentation base URL. A trailing `/` is dropped.
    pub fn with_docs_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let trimmed = url.trim_end_matches('/');
        self.docs_base_url = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Sets the contact metadata.
    pub fn with_contact(mut self, contact: OpenApiContact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets the license metadata.
    pub fn with_license(mut self, license: OpenApiLicense) -> Self {
        self.license = Some(license);
        self
    }

    /// Enables or disables the reference resolution pass.
    pub fn with_resolve_references(mut self, enabled: bool) -> Self {
        self.resolve_references = enabled;
        self
    }

    /// Docs anchor for an item id, if a docs base URL is configured.
    pub fn docs_anchor(&self, item_id: &str) -> Option<String> {
        if item_id.is_empty() {
            return None;
        }
        self.docs_base_url
            .as_ref()
            .map(|base| format!("{}/#{}", base, item_id))
    }
}
