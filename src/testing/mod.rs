//! Unified testing utilities for bridgrs
//!
//! This module consolidates the test payloads, binary fixtures and mock
//! providers used by unit and integration tests, so individual test files
//! never rebuild the same authenticator byte layouts by hand.
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built raw payloads, authenticator data and records
//! - [`mock`] - Mock credential providers with scripted outcomes

pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use mock::{MockProvider, OneShotProvider};

/// Common test constants
pub mod constants {
    /// Base64url credential identifier used across fixtures
    /// (decodes to `test-credential`)
    pub const TEST_CREDENTIAL_ID: &str = "dGVzdC1jcmVkZW50aWFs";

    /// Owning account identifier used across fixtures
    pub const TEST_CONTRACT_ID: &str = "test-contract";

    /// Storage namespace used across fixtures
    pub const TEST_NAMESPACE: &str = "test-app";

    /// Relying party origin baked into client data fixtures
    pub const TEST_ORIGIN: &str = "https://example.com";

    /// X coordinate fill byte for fixture keys
    pub const TEST_KEY_X: u8 = 0xaa;

    /// Y coordinate fill byte for fixture keys
    pub const TEST_KEY_Y: u8 = 0xbb;
}
