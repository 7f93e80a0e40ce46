//! Mock credential providers for exercising the broker without a platform
//! authenticator

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::broker::CredentialProvider;
use crate::utils::resolve_once::ResolveOnce;
use crate::webauthn::{ProviderFailure, RawCredentialPayload};

/// Scripted provider returning pre-configured results and recording the
/// options each call received
pub struct MockProvider {
    create_result: Result<RawCredentialPayload, ProviderFailure>,
    get_result: Result<RawCredentialPayload, ProviderFailure>,
    seen_options: Mutex<Vec<Value>>,
}

impl MockProvider {
    /// Provider that answers both ceremonies with `payload`
    #[must_use]
    pub fn succeeding_with(payload: RawCredentialPayload) -> Self {
        Self {
            create_result: Ok(payload.clone()),
            get_result: Ok(payload),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    /// Provider that answers both ceremonies with `failure`
    #[must_use]
    pub fn failing_with(failure: ProviderFailure) -> Self {
        Self {
            create_result: Err(failure.clone()),
            get_result: Err(failure),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    /// Options passed to this provider so far, in call order
    ///
    /// # Panics
    ///
    /// Panics if a previous caller poisoned the options lock.
    #[must_use]
    pub fn seen_options(&self) -> Vec<Value> {
        self.seen_options.lock().expect("options lock").clone()
    }

    fn record(&self, options: &Value) {
        self.seen_options
            .lock()
            .expect("options lock")
            .push(options.clone());
    }
}

#[async_trait]
impl CredentialProvider for MockProvider {
    async fn create_credential(
        &self,
        options: Value,
    ) -> Result<RawCredentialPayload, ProviderFailure> {
        self.record(&options);
        self.create_result.clone()
    }

    async fn get_credential(
        &self,
        options: Value,
    ) -> Result<RawCredentialPayload, ProviderFailure> {
        self.record(&options);
        self.get_result.clone()
    }
}

/// Provider that delivers its payload exactly once and reports
/// `INTERRUPTED` for every call after the first
pub struct OneShotProvider {
    payload: RawCredentialPayload,
    completed: ResolveOnce<()>,
}

impl OneShotProvider {
    #[must_use]
    pub fn new(payload: RawCredentialPayload) -> Self {
        Self {
            payload,
            completed: ResolveOnce::new(),
        }
    }

    fn complete(&self) -> Result<RawCredentialPayload, ProviderFailure> {
        if self.completed.resolve(()) {
            Ok(self.payload.clone())
        } else {
            Err(ProviderFailure::new(
                "INTERRUPTED",
                "completion already delivered",
            ))
        }
    }
}

#[async_trait]
impl CredentialProvider for OneShotProvider {
    async fn create_credential(
        &self,
        _options: Value,
    ) -> Result<RawCredentialPayload, ProviderFailure> {
        self.complete()
    }

    async fn get_credential(
        &self,
        _options: Value,
    ) -> Result<RawCredentialPayload, ProviderFailure> {
        self.complete()
    }
}
