//! Passkey broker facade
//!
//! [`PasskeyBroker`] ties the pieces together: it drives a native
//! [`CredentialProvider`], runs the provider's raw payload through the
//! response normalizer, and surfaces every failure as a DOM-style
//! [`CredentialError`]. Persistence stays explicit: the broker never saves
//! a credential on its own, it only stamps `lastUsedAt` on records the
//! application chose to keep.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::settings::BridgrsSettings;
use crate::store::{CredentialStore, CredentialUpdate, KeyValueStore};
use crate::utils::time::epoch_millis;
use crate::webauthn::{
    normalize_authentication, normalize_registration, AuthenticationResponse, CredentialError,
    ProviderFailure, RawCredentialPayload, RegistrationResponse,
};

/// A bridge to one native credential provider.
///
/// Implementations wrap a platform credential API and hand back whatever
/// payload the platform produced, untouched; shaping it is the broker's job.
/// The `options` value is the request JSON assembled by the relying party,
/// passed through verbatim.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Invoke native credential creation.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFailure`] carrying the platform failure code when
    /// the native operation does not produce a credential.
    async fn create_credential(
        &self,
        options: Value,
    ) -> Result<RawCredentialPayload, ProviderFailure>;

    /// Invoke native credential assertion.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderFailure`] carrying the platform failure code when
    /// the native operation does not produce an assertion.
    async fn get_credential(&self, options: Value)
        -> Result<RawCredentialPayload, ProviderFailure>;
}

/// Broker over one provider and one storage namespace
pub struct PasskeyBroker {
    provider: Arc<dyn CredentialProvider>,
    store: CredentialStore,
}

impl PasskeyBroker {
    #[must_use]
    pub fn new(provider: Arc<dyn CredentialProvider>, store: CredentialStore) -> Self {
        Self { provider, store }
    }

    /// Create a broker whose store namespace comes from settings
    #[must_use]
    pub fn from_settings(
        provider: Arc<dyn CredentialProvider>,
        backend: Arc<dyn KeyValueStore>,
        settings: &BridgrsSettings,
    ) -> Self {
        let store = CredentialStore::new(backend, settings.storage.namespace.clone());
        Self::new(provider, store)
    }

    /// Run a registration ceremony and normalize the provider's payload.
    ///
    /// The resulting credential is not persisted; call
    /// [`CredentialStore::save`] on [`Self::store`] once the application
    /// accepts it.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the provider reports a failure or
    /// the payload is structurally incompatible.
    pub async fn register(&self, options: Value) -> Result<RegistrationResponse, CredentialError> {
        let raw = self
            .provider
            .create_credential(options)
            .await
            .map_err(|failure| {
                log::info!("Provider registration failed: {failure}");
                CredentialError::from(failure)
            })?;

        let normalized = normalize_registration(raw)?;
        log::debug!("Normalized registration for credential {}", normalized.id);
        Ok(normalized)
    }

    /// Run an authentication ceremony and normalize the provider's payload.
    ///
    /// On success the matching stored credential, if any, gets its
    /// `lastUsedAt` stamped. That write is best-effort; a storage failure is
    /// logged and does not fail the authentication.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the provider reports a failure or
    /// the payload is structurally incompatible.
    pub async fn authenticate(
        &self,
        options: Value,
    ) -> Result<AuthenticationResponse, CredentialError> {
        let raw = self
            .provider
            .get_credential(options)
            .await
            .map_err(|failure| {
                log::info!("Provider authentication failed: {failure}");
                CredentialError::from(failure)
            })?;

        let normalized = normalize_authentication(raw)?;
        self.touch_last_used(&normalized.id).await;
        Ok(normalized)
    }

    /// The credential and session store behind this broker
    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Stamping an unknown credential is a no-op, so credentials the
    /// application never saved stay unsaved
    async fn touch_last_used(&self, credential_id: &str) {
        let update = CredentialUpdate {
            last_used_at: Some(epoch_millis()),
            ..CredentialUpdate::default()
        };
        if let Err(e) = self.store.update(credential_id, update).await {
            log::warn!("Could not record credential use for {credential_id}: {e}");
        }
    }
}
