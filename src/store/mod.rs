// Abstract state store
//
// The coordinator depends only on this subscription capability, not on a
// concrete store. Payloads cross the boundary as raw JSON values; the typed
// helpers below handle the (de)serialization for callers that want it.

mod memory;

pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::StoreError;

/// Callback invoked with a channel's current value on every change, and once
/// with the value present at subscribe time.
pub type Handler = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

/// Identifies one active subscription, for later removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    key: String,
    seq: u64,
}

impl SubscriptionId {
    pub(crate) fn new(key: &str, seq: u64) -> Self {
        Self {
            key: key.to_string(),
            seq,
        }
    }

    /// The channel this subscription is attached to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

/// A keyed, observable state store.
///
/// Writers publish raw JSON values under flat string keys; subscribers are
/// notified synchronously on every write, including writes that carry the
/// same value as before. Notification delivery is serialized by the host,
/// so handlers run to completion one at a time.
pub trait StateStore: Send + Sync {
    /// Attach a handler to a channel. The channel's current value (or `None`
    /// if the key has never been written) is delivered synchronously before
    /// this returns.
    fn subscribe(&self, key: &str, handler: Handler) -> SubscriptionId;

    /// Detach a previously attached handler.
    fn unsubscribe(&self, id: &SubscriptionId);

    /// Read the current value of a channel.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// Replace a channel's value and notify its subscribers.
    fn set_raw(&self, key: &str, value: Value);

    /// Merge into a channel's value and notify its subscribers. Object
    /// payloads merge key-by-key; anything else replaces.
    fn merge_raw(&self, key: &str, value: Value);

    /// Clear a channel and notify its subscribers with `None`.
    fn remove_raw(&self, key: &str);
}

/// Read a channel as a typed value.
pub fn get<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Result<Option<T>, StoreError> {
    match store.get_raw(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            }),
    }
}

/// Write a typed value to a channel.
pub fn set<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_raw(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoredCredentials;
    use serde_json::json;

    #[test]
    fn test_typed_get_set_round_trip() {
        let store = MemoryStore::new();
        let credentials = StoredCredentials {
            login: Some("user-1".to_string()),
        };

        set(&store, "credentials", &credentials).unwrap();
        let read: Option<StoredCredentials> = get(&store, "credentials").unwrap();
        assert_eq!(read, Some(credentials));
    }

    #[test]
    fn test_typed_get_missing_key() {
        let store = MemoryStore::new();
        let read: Option<StoredCredentials> = get(&store, "credentials").unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_typed_get_wrong_shape() {
        let store = MemoryStore::new();
        store.set_raw("credentials", json!("not-an-object"));

        let err = get::<StoredCredentials>(&store, "credentials").unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref key, .. } if key == "credentials"));
    }
}
