//! Credential and session persistence
//!
//! [`CredentialStore`] layers CRUD plus a self-maintained identifier index
//! over a flat [`KeyValueStore`], which has no prefix queries. Each record is
//! one JSON value under `<namespace>:credential:<id>`; the index is a JSON
//! id list under `<namespace>:credentials-index`; the session occupies the
//! single slot `<namespace>:session`.
//!
//! `save` and `delete` write the value key and the index key sequentially,
//! not atomically. A crash between the two writes can leave an index entry
//! without a value or a value without an index entry, and concurrent writers
//! to the same namespace race on the index (last writer wins). The backing
//! stores this targets have no transactional primitive; callers needing
//! strict consistency must serialize writes to a namespace themselves.
//!
//! Individual records that fail to parse are downgraded to absence rather
//! than errors, so one corrupt value never breaks lookups of the rest.

use std::sync::Arc;

use super::backend::KeyValueStore;
use super::records::{CredentialRecord, CredentialUpdate, SessionRecord};
use super::StoreError;

/// Namespaced credential and session store over a flat key-value backend
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl CredentialStore {
    /// Create a store whose keys all carry `namespace` as their prefix
    pub fn new(backend: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    fn credential_key(&self, credential_id: &str) -> String {
        format!("{}:credential:{credential_id}", self.namespace)
    }

    fn index_key(&self) -> String {
        format!("{}:credentials-index", self.namespace)
    }

    fn session_key(&self) -> String {
        format!("{}:session", self.namespace)
    }

    /// Persist a credential record and index its identifier.
    ///
    /// Re-saving an already indexed credential overwrites the value but does
    /// not duplicate the index entry.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when serialization or a backend write fails.
    pub async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(record)?;
        self.backend
            .set(&self.credential_key(&record.credential_id), &serialized)
            .await?;

        let mut index = self.load_index().await?;
        if !index.iter().any(|id| id == &record.credential_id) {
            index.push(record.credential_id.clone());
            self.store_index(&index).await?;
        }
        Ok(())
    }

    /// Load one credential record.
    ///
    /// Returns `None` when the record is absent or its value fails to parse.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend read fails.
    pub async fn get(&self, credential_id: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let Some(serialized) = self.backend.get(&self.credential_key(credential_id)).await?
        else {
            return Ok(None);
        };

        match serde_json::from_str(&serialized) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::warn!("Skipping unreadable credential record {credential_id}: {e}");
                Ok(None)
            }
        }
    }

    /// Load every indexed credential record, skipping any that fail to parse.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when a backend read fails.
    pub async fn get_all(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let index = self.load_index().await?;
        let mut records = Vec::with_capacity(index.len());
        for credential_id in index {
            if let Some(record) = self.get(&credential_id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Load the credentials owned by `contract_id`.
    ///
    /// Materializes the full set and filters it; read amplification is
    /// linear in the index size since the backend cannot query by prefix.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when a backend read fails.
    pub async fn get_by_contract(
        &self,
        contract_id: &str,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|record| record.contract_id == contract_id)
            .collect())
    }

    /// Merge partial fields over an existing record.
    ///
    /// A no-op when the record does not exist. The credential identifier and
    /// public key cannot be altered through this path.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when serialization or a backend access fails.
    pub async fn update(
        &self,
        credential_id: &str,
        update: CredentialUpdate,
    ) -> Result<(), StoreError> {
        let Some(mut record) = self.get(credential_id).await? else {
            return Ok(());
        };
        record.apply(update);

        let serialized = serde_json::to_string(&record)?;
        self.backend
            .set(&self.credential_key(credential_id), &serialized)
            .await
    }

    /// Remove a credential record and its index entry.
    ///
    /// Deleting an absent identifier is a no-op.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when a backend access fails.
    pub async fn delete(&self, credential_id: &str) -> Result<(), StoreError> {
        self.backend
            .remove(&self.credential_key(credential_id))
            .await?;

        let mut index = self.load_index().await?;
        let len_before = index.len();
        index.retain(|id| id != credential_id);
        if index.len() != len_before {
            self.store_index(&index).await?;
        }
        Ok(())
    }

    /// Remove every indexed credential, the index itself and the session.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when a backend access fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        for credential_id in self.load_index().await? {
            self.backend
                .remove(&self.credential_key(&credential_id))
                .await?;
        }
        self.backend.remove(&self.index_key()).await?;
        self.backend.remove(&self.session_key()).await
    }

    /// Replace the namespace's session wholesale.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when serialization or the backend write fails.
    pub async fn save_session(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(session)?;
        self.backend.set(&self.session_key(), &serialized).await
    }

    /// Load the namespace's session.
    ///
    /// Returns `None` when absent or unparseable.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend read fails.
    pub async fn get_session(&self) -> Result<Option<SessionRecord>, StoreError> {
        let Some(serialized) = self.backend.get(&self.session_key()).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&serialized) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("Skipping unreadable session record: {e}");
                Ok(None)
            }
        }
    }

    /// Remove the namespace's session; absent sessions are a no-op.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend write fails.
    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.backend.remove(&self.session_key()).await
    }

    /// An unparseable index reads as empty rather than failing, matching the
    /// soft-miss policy for records
    async fn load_index(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .backend
            .get(&self.index_key())
            .await?
            .and_then(|serialized| serde_json::from_str(&serialized).ok())
            .unwrap_or_default())
    }

    async fn store_index(&self, index: &[String]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(index)?;
        self.backend.set(&self.index_key(), &serialized).await
    }
}
