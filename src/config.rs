// Coordinator configuration

use serde::Deserialize;

/// Default prefix for generated login identifiers.
const DEFAULT_LOGIN_PREFIX: &str = "chat-login-";

/// Settings for the re-authentication coordinator.
///
/// Deserializable so hosts can embed it in their own configuration files;
/// `Default` covers the common case.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Prefix prepended to generated login identifiers, so the credentials
    /// created by this system are recognizable in the backend.
    pub login_prefix: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            login_prefix: DEFAULT_LOGIN_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_login_prefix() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.login_prefix, "chat-login-");
    }

    #[test]
    fn test_deserialize_with_override() {
        let config: CoordinatorConfig =
            serde_json::from_str(r#"{"login_prefix": "acme-"}"#).unwrap();
        assert_eq!(config.login_prefix, "acme-");
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: CoordinatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.login_prefix, "chat-login-");
    }
}
