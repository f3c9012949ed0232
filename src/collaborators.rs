// External collaborator seams
//
// The coordinator only reacts; actual network traffic and API calls are
// owned by these collaborators. Every call here is fire-and-forget from the
// coordinator's point of view: failures are reported by the collaborators
// themselves and never surface back, and retries belong to the request
// layer, not this crate.

use serde_json::Value;

/// Request layer. Resubmits a previously failed request once a fresh token
/// is being negotiated.
pub trait Network: Send + Sync {
    fn post(&self, command: &str, parameters: &Value, request_type: &str);
}

/// Session API. Performs the re-authentication handshake and is responsible
/// for writing the resulting session/credentials updates back into the
/// store and for ending the reauthentication signal.
pub trait SessionActions: Send + Sync {
    fn reauthenticate(&self);
}

/// Credentials API. Registers a new persistent login credential so the
/// session can later be refreshed without user interaction.
pub trait CredentialActions: Send + Sync {
    fn create_login(&self, login: &str, secret: &str);
}
