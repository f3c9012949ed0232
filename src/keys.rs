// Channel keys in the shared state store
//
// The store is keyed by flat string identifiers. Writers elsewhere in the
// system (network layer, session/login actions) publish under these keys;
// the coordinator only subscribes to them.

/// Persisted login credential used for silent re-authentication.
pub const CREDENTIALS: &str = "credentials";

/// Set by the network layer when a request fails with an expired session.
pub const REAUTHENTICATING: &str = "reauthenticating";

/// The currently active authenticated session.
pub const SESSION: &str = "session";
