// In-memory state store
//
// Backs the coordinator in tests and in hosts that keep persistence
// elsewhere. Values and subscriber lists live in concurrent maps, but
// notification delivery itself is synchronous: a write returns only after
// every subscriber has run.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Handler, StateStore, SubscriptionId};

pub struct MemoryStore {
    values: DashMap<String, Value>,
    subscribers: DashMap<String, Vec<(u64, Handler)>>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            subscribers: DashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Number of handlers currently attached to a channel.
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.subscribers.get(key).map(|subs| subs.len()).unwrap_or(0)
    }

    fn notify(&self, key: &str, value: Option<&Value>) {
        // Snapshot the handler list before invoking anything, so handlers
        // may re-enter the store (subscribe, write other keys) without
        // holding a map shard lock.
        let handlers: Vec<Handler> = self
            .subscribers
            .get(key)
            .map(|subs| subs.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(value);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn subscribe(&self, key: &str, handler: Handler) -> SubscriptionId {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .entry(key.to_string())
            .or_default()
            .push((seq, handler.clone()));

        tracing::debug!(key, seq, "subscribed to channel");

        // Connect semantics: the subscriber sees the current value right
        // away instead of waiting for the next write.
        let current = self.values.get(key).map(|entry| entry.value().clone());
        handler(current.as_ref());

        SubscriptionId::new(key, seq)
    }

    fn unsubscribe(&self, id: &SubscriptionId) {
        if let Some(mut subs) = self.subscribers.get_mut(id.key()) {
            subs.retain(|(seq, _)| *seq != id.seq());
        }
        tracing::debug!(key = id.key(), "unsubscribed from channel");
    }

    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    fn set_raw(&self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value.clone());
        self.notify(key, Some(&value));
    }

    fn merge_raw(&self, key: &str, value: Value) {
        let merged = match (self.values.get(key).map(|e| e.value().clone()), value) {
            (Some(Value::Object(mut existing)), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
                Value::Object(existing)
            }
            // No existing object to merge into: behaves like a plain set.
            (_, incoming) => incoming,
        };

        self.values.insert(key.to_string(), merged.clone());
        self.notify(key, Some(&merged));
    }

    fn remove_raw(&self, key: &str) {
        self.values.remove(key);
        self.notify(key, None);
    }
}
