//! `WebAuthn` wire types
//!
//! Raw payload shapes as native credential providers emit them, and the
//! canonical response shapes this crate guarantees to produce. Raw types are
//! deliberately loose (every field optional) because the provider families
//! disagree about which fields they populate; the canonical types encode the
//! shape relying parties actually get.

use serde::{Deserialize, Serialize};

/// The only credential type `WebAuthn` defines
pub const CREDENTIAL_TYPE: &str = "public-key";

/// Recognized authenticator attachment modalities; anything else is dropped
pub const ATTACHMENT_MODALITIES: [&str; 2] = ["platform", "cross-platform"];

/// A credential payload as a native provider hands it over, before
/// normalization. Field presence varies by provider and operation.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawCredentialPayload {
    pub id: Option<String>, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: Option<String>, // Base64URL-encoded raw credential ID
    pub r#type: Option<String>, // Nominally "public-key"; some providers omit it
    #[serde(rename = "authenticatorAttachment")]
    pub authenticator_attachment: Option<String>, // "platform", "cross-platform", or garbage
    #[serde(rename = "clientExtensionResults")]
    pub client_extension_results: Option<serde_json::Value>, // Extension output mapping
    pub response: Option<RawAuthenticatorResponse>, // Operation-specific fields
}

/// Union of the response fields seen across providers and operations
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawAuthenticatorResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Option<String>, // Base64URL-encoded client data JSON
    #[serde(rename = "attestationObject")]
    pub attestation_object: Option<String>, // Base64URL-encoded attestation object
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: Option<String>, // Base64URL-encoded authenticator data
    pub signature: Option<String>, // Base64URL-encoded assertion signature
    #[serde(rename = "userHandle")]
    pub user_handle: Option<String>, // Base64URL-encoded user handle, or a literal "null"
    pub transports: Option<Vec<String>>, // Transport hints ("internal", "hybrid", ...)
    #[serde(rename = "publicKey")]
    pub public_key: Option<String>, // Base64URL-encoded public key, when the provider parsed one
    #[serde(rename = "publicKeyAlgorithm")]
    pub public_key_algorithm: Option<i32>, // COSE algorithm identifier (-7 for ES256)
}

/// Canonical registration response returned to the relying party
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegistrationResponse {
    pub id: String, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: String, // Base64URL-encoded raw credential ID
    pub r#type: String, // Always "public-key"
    #[serde(rename = "authenticatorAttachment", skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>, // "platform" or "cross-platform" only
    #[serde(rename = "clientExtensionResults")]
    pub client_extension_results: serde_json::Value, // Never absent; empty mapping by default
    pub response: AuthenticatorAttestationResponse,
}

/// Canonical authentication response returned to the relying party
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthenticationResponse {
    pub id: String, // Base64URL-encoded credential ID
    #[serde(rename = "rawId")]
    pub raw_id: String, // Base64URL-encoded raw credential ID
    pub r#type: String, // Always "public-key"
    #[serde(rename = "authenticatorAttachment", skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>, // "platform" or "cross-platform" only
    #[serde(rename = "clientExtensionResults")]
    pub client_extension_results: serde_json::Value, // Never absent; empty mapping by default
    pub response: AuthenticatorAssertionResponse,
}

/// Authenticator attestation response during registration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthenticatorAttestationResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL-encoded client data JSON
    #[serde(rename = "attestationObject")]
    pub attestation_object: String, // Base64URL-encoded attestation object
    #[serde(rename = "authenticatorData", skip_serializing_if = "Option::is_none")]
    pub authenticator_data: Option<String>, // Base64URL-encoded authenticator data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>, // Transport hints; absent rather than empty
    #[serde(rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>, // Base64URL-encoded key, provider-supplied or recovered
    #[serde(rename = "publicKeyAlgorithm", skip_serializing_if = "Option::is_none")]
    pub public_key_algorithm: Option<i32>, // COSE algorithm identifier
}

/// Authenticator assertion response during authentication
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthenticatorAssertionResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL-encoded client data JSON
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String, // Base64URL-encoded authenticator data
    pub signature: String, // Base64URL-encoded assertion signature
    #[serde(rename = "userHandle", skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>, // Base64URL-encoded user handle
}
