// Typed payloads for the observed channels
//
// Wire names are camelCase to match what the store writers publish.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Persisted login credential, mirrored read-only by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// "A request failed with an expired session and is pending retry."
///
/// The `original_*` fields describe the request to resubmit once a fresh
/// token is available. They default when absent so a bare
/// `{"isInProgress": false}` write still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReauthSignal {
    pub is_in_progress: bool,
    #[serde(default)]
    pub original_command: String,
    #[serde(default)]
    pub original_parameters: Value,
    #[serde(default)]
    pub original_type: String,
}

/// The currently active authenticated session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Loading/error flags and whatever else the session writers attach.
    /// Kept opaque; the coordinator only cares about the token.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reauth_signal_decodes_full_payload() {
        let signal: ReauthSignal = serde_json::from_value(json!({
            "isInProgress": true,
            "originalCommand": "Get_ReportStuff",
            "originalParameters": {"reportID": 42},
            "originalType": "post",
        }))
        .unwrap();

        assert!(signal.is_in_progress);
        assert_eq!(signal.original_command, "Get_ReportStuff");
        assert_eq!(signal.original_parameters, json!({"reportID": 42}));
        assert_eq!(signal.original_type, "post");
    }

    #[test]
    fn test_reauth_signal_defaults_original_request_fields() {
        let signal: ReauthSignal =
            serde_json::from_value(json!({"isInProgress": false})).unwrap();

        assert!(!signal.is_in_progress);
        assert_eq!(signal.original_command, "");
        assert_eq!(signal.original_parameters, Value::Null);
    }

    #[test]
    fn test_session_keeps_unknown_flags() {
        let session: Session = serde_json::from_value(json!({
            "authToken": "token-1",
            "loading": true,
            "error": null,
        }))
        .unwrap();

        assert_eq!(session.auth_token.as_deref(), Some("token-1"));
        assert_eq!(session.extra.get("loading"), Some(&json!(true)));
        assert_eq!(session.extra.get("error"), Some(&Value::Null));
    }

    #[test]
    fn test_credentials_login_optional() {
        let credentials: StoredCredentials = serde_json::from_value(json!({})).unwrap();
        assert!(credentials.login.is_none());

        let credentials: StoredCredentials =
            serde_json::from_value(json!({"login": "user-1"})).unwrap();
        assert_eq!(credentials.login.as_deref(), Some("user-1"));
    }
}
