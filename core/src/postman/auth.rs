//! # Auth Model
//!
//! Postman auth blocks reduced to the schemes OpenAPI can describe, and their
//! security-scheme fragments.

use crate::postman::wire::RawAuth;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Location and name of an API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyAuth {
    /// `header`, `query` or `cookie`.
    pub location: String,
    /// Header / query / cookie name carrying the key.
    pub name: String,
}

impl Default for ApiKeyAuth {
    fn default() -> Self {
        Self {
            location: "header".to_string(),
            name: "X-API-Key".to_string(),
        }
    }
}

/// A supported auth scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Explicitly no auth; also the fallback for unknown types.
    NoAuth,
    /// API key in a header, query parameter or cookie.
    ApiKey(ApiKeyAuth),
    /// HTTP basic.
    Basic,
    /// HTTP bearer token.
    Bearer,
}

impl Auth {
    /// Parses an auth block. `None` when the block has no `type`.
    ///
    /// Both `apikey` (Postman's spelling) and `apikeyauth` parse as
    /// [`Auth::ApiKey`]. Unknown type strings (oauth2, digest, ...) become
    /// [`Auth::NoAuth`].
    pub fn parse(raw: &RawAuth) -> Option<Self> {
        let auth_type = raw.auth_type.as_deref()?;
        let auth = match auth_type {
            "noauth" => Self::NoAuth,
            "apikey" | "apikeyauth" => Self::ApiKey(parse_api_key(raw, auth_type)),
            "basic" => Self::Basic,
            "bearer" => Self::Bearer,
            other => {
                warn!(auth_type = other, "Unsupported auth type, treating as noauth");
                Self::NoAuth
            }
        };
        Some(auth)
    }

    /// The security scheme name this auth registers under.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            Self::NoAuth => "noauth",
            Self::ApiKey(_) => "apikeyauth",
            Self::Basic => "basic",
            Self::Bearer => "bearer",
        }
    }

    /// `{scheme_name: scheme}`; empty for [`Auth::NoAuth`].
    pub fn to_security_scheme(&self) -> Map<String, Value> {
        let scheme = match self {
            Self::NoAuth => return Map::new(),
            Self::ApiKey(key) => json!({
                "type": "apiKey",
                "in": key.location,
                "name": key.name
            }),
            Self::Basic => json!({"type": "http", "scheme": "basic"}),
            Self::Bearer => json!({
                "type": "http",
                "scheme": "bearer",
                "bearerFormat": "API Token"
            }),
        };

        let mut out = Map::new();
        out.insert(self.scheme_name().to_string(), scheme);
        out
    }

    /// The `security` requirement list for an operation or document using this auth.
    ///
    /// `noauth` renders as an empty list, which in OpenAPI explicitly removes
    /// any inherited requirement. It is not `[{"noauth": []}]`: `noauth`
    /// registers no security scheme, and a requirement may only name
    /// declared schemes.
    pub fn security_requirement(&self) -> Value {
        match self {
            Self::NoAuth => json!([]),
            other => json!([{ other.scheme_name(): [] }]),
        }
    }
}

fn parse_api_key(raw: &RawAuth, auth_type: &str) -> ApiKeyAuth {
    let params = raw
        .parameters
        .get(auth_type)
        .or_else(|| raw.parameters.get("apikey"))
        .and_then(Value::as_array);

    let lookup = |key: &str| -> Option<String> {
        params?
            .iter()
            .find(|p| p.get("key").and_then(Value::as_str) == Some(key))
            .and_then(|p| p.get("value"))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let defaults = ApiKeyAuth::default();
    let location = lookup("in")
        .filter(|loc| matches!(loc.as_str(), "header" | "query" | "cookie"))
        .unwrap_or(defaults.location);
    let name = lookup("key").or_else(|| lookup("name")).unwrap_or(defaults.name);

    ApiKeyAuth { location, name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn auth(json: &str) -> Option<Auth> {
        let raw: RawAuth = serde_json::from_str(json).unwrap();
        Auth::parse(&raw)
    }

    #[test]
    fn test_missing_type_is_absent() {
        assert_eq!(auth("{}"), None);
        assert_eq!(auth(r#"{"bearer": []}"#), None);
    }

    #[test]
    fn test_unknown_type_falls_back_to_noauth() {
        assert_eq!(auth(r#"{"type": "oauth2"}"#), Some(Auth::NoAuth));
        assert!(Auth::NoAuth.to_security_scheme().is_empty());
    }

    #[test]
    fn test_bearer_scheme() {
        let bearer = auth(r#"{"type": "bearer", "bearer": [{"key": "token", "value": "{{api_token}}"}]}"#)
            .unwrap();
        assert_eq!(
            Value::Object(bearer.to_security_scheme()),
            json!({"bearer": {"type": "http", "scheme": "bearer", "bearerFormat": "API Token"}})
        );
        assert_eq!(bearer.security_requirement(), json!([{"bearer": []}]));
    }

    #[test]
    fn test_basic_scheme() {
        let basic = auth(r#"{"type": "basic"}"#).unwrap();
        assert_eq!(
            Value::Object(basic.to_security_scheme()),
            json!({"basic": {"type": "http", "scheme": "basic"}})
        );
    }

    #[test]
    fn test_api_key_defaults() {
        let key = auth(r#"{"type": "apikeyauth"}"#).unwrap();
        assert_eq!(
            Value::Object(key.to_security_scheme()),
            json!({"apikeyauth": {"type": "apiKey", "in": "header", "name": "X-API-Key"}})
        );
    }

    #[test]
    fn test_api_key_reads_parameters() {
        let key = auth(
            r#"{"type": "apikey", "apikey": [
                {"key": "value", "value": "{{key}}"},
                {"key": "key", "value": "api_key"},
                {"key": "in", "value": "query"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            key,
            Auth::ApiKey(ApiKeyAuth {
                location: "query".into(),
                name: "api_key".into()
            })
        );
        assert_eq!(key.scheme_name(), "apikeyauth");
    }

    #[test]
    fn test_noauth_requirement_clears_security() {
        assert_eq!(Auth::NoAuth.security_requirement(), json!([]));
        let oauth = auth(r#"{"type": "oauth2"}"#).unwrap();
        assert_eq!(oauth.security_requirement(), json!([]));
    }
}
