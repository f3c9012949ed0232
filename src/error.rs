// Error types for the typed store boundary
//
// The coordinator itself raises no errors: undecodable channel payloads are
// logged and skipped, and collaborator failures are opaque to it. Errors
// only exist where typed values cross the raw JSON store boundary.

use thiserror::Error;

/// Errors raised when moving typed values in or out of the raw store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Stored value did not match the expected shape
    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized for storage
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
