//! Key-value storage backends
//!
//! The credential store runs on any flat string-keyed value store. Platform
//! embeddings implement [`KeyValueStore`] over their native preference or
//! settings API; [`MemoryStore`] backs tests and short-lived processes.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::StoreError;

/// A flat string-keyed value store with no prefix-query capability.
///
/// Implementations must tolerate `remove` on absent keys as a no-op.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the underlying store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the underlying store cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`; absent keys are a no-op.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the underlying store cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory [`KeyValueStore`] over a read-write lock
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));

        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("missing").await.unwrap();
    }
}
