//! Response normalization for provider credential payloads
//!
//! Every provider family ships a slightly different payload: missing `type`
//! fields, empty transport lists, sentinel `"null"` user handles, absent
//! extension maps. The normalizer reconciles those into the canonical
//! response shapes in [`crate::webauthn::types`], recovering the public key
//! from raw authenticator bytes when the provider did not expose one.
//!
//! Normalization is a pure transformation. It fails only when the payload is
//! structurally incompatible (a mandatory member missing or empty); it never
//! substitutes placeholder values for mandatory fields.

use crate::webauthn::codec::encode_base64url;
use crate::webauthn::errors::CredentialError;
use crate::webauthn::recovery::recover_public_key;
use crate::webauthn::types::{
    AuthenticationResponse, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    RawCredentialPayload, RegistrationResponse, ATTACHMENT_MODALITIES, CREDENTIAL_TYPE,
};

/// Sentinel strings some provider bridges emit instead of omitting the
/// user handle
const ABSENT_SENTINELS: [&str; 2] = ["null", "undefined"];

/// Normalize a raw registration payload into the canonical shape.
///
/// Forces `type` to the literal credential type, drops unrecognized
/// attachment values, defaults the extension map, and recovers the public
/// key from authenticator data or the attestation object when the provider
/// did not supply one.
///
/// # Errors
/// Returns a `TypeError`-classified [`CredentialError`] when `id`, `rawId`,
/// `response.clientDataJSON` or `response.attestationObject` is missing or
/// empty.
pub fn normalize_registration(
    raw: RawCredentialPayload,
) -> Result<RegistrationResponse, CredentialError> {
    let id = require(raw.id, "id")?;
    let raw_id = require(raw.raw_id, "rawId")?;
    let authenticator_attachment = recognized_attachment(raw.authenticator_attachment);
    let client_extension_results = extension_results_or_default(raw.client_extension_results);

    let response = raw
        .response
        .ok_or_else(|| CredentialError::invalid_input("Registration payload is missing response"))?;

    let public_key = recover_public_key(
        response.public_key.as_deref(),
        response.authenticator_data.as_deref(),
        response.attestation_object.as_deref(),
    )
    .map(|key| encode_base64url(&key));

    Ok(RegistrationResponse {
        id,
        raw_id,
        r#type: CREDENTIAL_TYPE.to_string(),
        authenticator_attachment,
        client_extension_results,
        response: AuthenticatorAttestationResponse {
            client_data_json: require(response.client_data_json, "response.clientDataJSON")?,
            attestation_object: require(response.attestation_object, "response.attestationObject")?,
            authenticator_data: present(response.authenticator_data),
            transports: response.transports.filter(|t| !t.is_empty()),
            public_key,
            public_key_algorithm: response.public_key_algorithm,
        },
    })
}

/// Normalize a raw authentication payload into the canonical shape.
///
/// Applies the same `type`, attachment and extension rules as registration
/// and converts sentinel `"null"`/`"undefined"` user handles to true absence.
///
/// # Errors
/// Returns a `TypeError`-classified [`CredentialError`] when `id`, `rawId`,
/// `response.clientDataJSON`, `response.authenticatorData` or
/// `response.signature` is missing or empty.
pub fn normalize_authentication(
    raw: RawCredentialPayload,
) -> Result<AuthenticationResponse, CredentialError> {
    let id = require(raw.id, "id")?;
    let raw_id = require(raw.raw_id, "rawId")?;
    let authenticator_attachment = recognized_attachment(raw.authenticator_attachment);
    let client_extension_results = extension_results_or_default(raw.client_extension_results);

    let response = raw.response.ok_or_else(|| {
        CredentialError::invalid_input("Authentication payload is missing response")
    })?;

    Ok(AuthenticationResponse {
        id,
        raw_id,
        r#type: CREDENTIAL_TYPE.to_string(),
        authenticator_attachment,
        client_extension_results,
        response: AuthenticatorAssertionResponse {
            client_data_json: require(response.client_data_json, "response.clientDataJSON")?,
            authenticator_data: require(response.authenticator_data, "response.authenticatorData")?,
            signature: require(response.signature, "response.signature")?,
            user_handle: present(response.user_handle)
                .filter(|handle| !ABSENT_SENTINELS.contains(&handle.as_str())),
        },
    })
}

fn require(field: Option<String>, name: &str) -> Result<String, CredentialError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CredentialError::invalid_input(format!("Payload is missing {name}")))
}

/// Empty optional strings collapse to absence
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn recognized_attachment(attachment: Option<String>) -> Option<String> {
    attachment.filter(|value| ATTACHMENT_MODALITIES.contains(&value.as_str()))
}

fn extension_results_or_default(results: Option<serde_json::Value>) -> serde_json::Value {
    match results {
        Some(value) if !value.is_null() => value,
        _ => serde_json::Value::Object(serde_json::Map::new()),
    }
}
