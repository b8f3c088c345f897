//! # Collection Info

use crate::config::ConversionOptions;
use crate::oas::document::OpenApiInfo;
use crate::postman::wire::{description_text, RawInfo};
use crate::strings::string_formatting;

/// Collection metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    /// Collection name, `"API"` when missing.
    pub name: String,
    /// Collection version, `"1.0.0"` when missing.
    pub version: String,
    /// Cleaned description.
    pub description: String,
    /// Postman schema URL.
    pub schema: Option<String>,
}

impl Info {
    /// Builds info from its wire form.
    pub fn from_raw(raw: &RawInfo) -> Self {
        Self {
            name: raw
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "API".to_string()),
            version: raw
                .version
                .as_ref()
                .map(|v| v.as_text())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "1.0.0".to_string()),
            description: string_formatting(description_text(&raw.description)),
            schema: raw.schema.clone(),
        }
    }

    /// The OpenAPI Info Object, with contact and license from `options`.
    pub fn to_openapi(&self, options: &ConversionOptions) -> OpenApiInfo {
        let mut info = OpenApiInfo::new(&self.name, &self.version);
        if !self.description.is_empty() {
            info = info.with_description(&self.description);
        }
        if let Some(contact) = &options.contact {
            info = info.with_contact(contact.clone());
        }
        if let Some(license) = &options.license {
            info = info.with_license(license.clone());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::OpenApiLicense;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let info = Info::from_raw(&RawInfo::default());
        assert_eq!(info.name, "API");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(
            info.to_openapi(&ConversionOptions::new()).to_value(),
            json!({"title": "API", "version": "1.0.0"})
        );
    }

    #[test]
    fn test_description_and_license() {
        let raw: RawInfo = serde_json::from_str(
            r#"{"name": "Fleet API", "version": {"major": 2, "minor": 0, "patch": 1}, "description": "<p>Device management</p>"}"#,
        )
        .unwrap();
        let options = ConversionOptions::new().with_license(OpenApiLicense::new("MIT").with_identifier("MIT"));
        assert_eq!(
            Info::from_raw(&raw).to_openapi(&options).to_value(),
            json!({
                "title": "Fleet API",
                "version": "2.0.1",
                "description": "Device management",
                "license": {"name": "MIT", "identifier": "MIT"}
            })
        );
    }
}
