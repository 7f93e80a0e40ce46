//! `WebAuthn` normalization core
//!
//! This module provides the provider-independent `WebAuthn` machinery: the
//! base64url codec, public-key recovery from raw authenticator bytes, the
//! provider-to-DOM error taxonomy, and the response normalizer that ties
//! them together. Everything here is pure and synchronous.

mod codec;
mod errors;
mod normalizer;
mod recovery;
mod types;

// Re-exports for public use
pub use codec::{decode_base64url, encode_base64url, scan_for_byte_pattern};
pub use errors::{map_provider_failure, CredentialError, DomErrorName, ProviderFailure};
pub use normalizer::{normalize_authentication, normalize_registration};
pub use recovery::{
    extract_public_key_from_attestation, extract_public_key_from_authenticator_data,
    recover_public_key, COSE_EC2_P256_PREFIX,
};
pub use types::*;
