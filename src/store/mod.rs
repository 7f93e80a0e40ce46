//! Credential and session persistence over flat key-value storage

pub mod backend;
pub mod credentials;
pub mod records;

pub use backend::{KeyValueStore, MemoryStore};
pub use credentials::CredentialStore;
pub use records::{CredentialRecord, CredentialUpdate, SessionRecord};

/// Failures raised by the storage layer.
///
/// Parse failures on individual records are deliberately not represented
/// here; the store downgrades those to absence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend: {0}")]
    Backend(String),
    #[error("serialize: {0}")]
    Serialization(#[from] serde_json::Error),
}
