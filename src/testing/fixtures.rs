//! Test fixtures providing pre-built test objects
//!
//! This module provides the payloads and binary buffers tests need most:
//! raw provider payloads for both ceremonies, authenticator data with a real
//! attested-credential layout, and CBOR attestation objects a byte scan can
//! find a COSE key inside.

use std::sync::Arc;

use crate::store::{CredentialRecord, CredentialStore, MemoryStore, SessionRecord};
use crate::utils::time::epoch_millis;
use crate::webauthn::{
    encode_base64url, RawAuthenticatorResponse, RawCredentialPayload, COSE_EC2_P256_PREFIX,
};

use super::constants::{
    TEST_CONTRACT_ID, TEST_CREDENTIAL_ID, TEST_KEY_X, TEST_KEY_Y, TEST_NAMESPACE, TEST_ORIGIN,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Raw registration payload the way a well-behaved provider emits it.
    ///
    /// Carries no explicit public key, so normalization exercises the
    /// recovery path through the authenticator data.
    #[must_use]
    pub fn registration_payload() -> RawCredentialPayload {
        let auth_data = Self::authenticator_data(
            &Self::credential_id_bytes(),
            TEST_KEY_X,
            TEST_KEY_Y,
        );
        RawCredentialPayload {
            id: Some(TEST_CREDENTIAL_ID.to_string()),
            raw_id: Some(TEST_CREDENTIAL_ID.to_string()),
            r#type: Some("public-key".to_string()),
            authenticator_attachment: Some("platform".to_string()),
            client_extension_results: None,
            response: Some(RawAuthenticatorResponse {
                client_data_json: Some(Self::client_data("webauthn.create")),
                attestation_object: Some(encode_base64url(&Self::attestation_object(&auth_data))),
                authenticator_data: Some(encode_base64url(&auth_data)),
                transports: Some(vec!["internal".to_string(), "hybrid".to_string()]),
                public_key: None,
                public_key_algorithm: Some(-7),
                ..RawAuthenticatorResponse::default()
            }),
        }
    }

    /// Raw authentication payload with a minimal 37-byte authenticator data
    #[must_use]
    pub fn authentication_payload() -> RawCredentialPayload {
        RawCredentialPayload {
            id: Some(TEST_CREDENTIAL_ID.to_string()),
            raw_id: Some(TEST_CREDENTIAL_ID.to_string()),
            r#type: Some("public-key".to_string()),
            authenticator_attachment: Some("platform".to_string()),
            client_extension_results: None,
            response: Some(RawAuthenticatorResponse {
                client_data_json: Some(Self::client_data("webauthn.get")),
                authenticator_data: Some(encode_base64url(&Self::assertion_authenticator_data())),
                signature: Some(encode_base64url(b"test-signature")),
                user_handle: Some(encode_base64url(b"test-user")),
                ..RawAuthenticatorResponse::default()
            }),
        }
    }

    /// The raw bytes behind [`TEST_CREDENTIAL_ID`]
    #[must_use]
    pub fn credential_id_bytes() -> Vec<u8> {
        b"test-credential".to_vec()
    }

    /// Attested-credential authenticator data: RP-ID hash, flags, counter,
    /// AAGUID, credential ID with its length field, then a COSE key with
    /// the given coordinate fill bytes
    #[must_use]
    pub fn authenticator_data(credential_id: &[u8], x: u8, y: u8) -> Vec<u8> {
        let id_len = u16::try_from(credential_id.len()).expect("credential id fits in u16");

        let mut data = Vec::new();
        data.extend_from_slice(&[0u8; 32]); // RP-ID hash
        data.push(0x45); // Flags: UP | UV | AT
        data.extend_from_slice(&[0, 0, 0, 1]); // Signature counter
        data.extend_from_slice(&[0u8; 16]); // AAGUID
        data.extend_from_slice(&id_len.to_be_bytes());
        data.extend_from_slice(credential_id);
        data.extend_from_slice(&Self::cose_public_key(x, y));
        data
    }

    /// Minimal authenticator data without attested credential data, as seen
    /// in assertion responses
    #[must_use]
    pub fn assertion_authenticator_data() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[0u8; 32]); // RP-ID hash
        data.push(0x05); // Flags: UP | UV
        data.extend_from_slice(&[0, 0, 0, 2]); // Signature counter
        data
    }

    /// COSE EC2 key bytes: the canonical P-256 prefix, 32 bytes of `x`,
    /// the y label and 32 bytes of `y`
    #[must_use]
    pub fn cose_public_key(x: u8, y: u8) -> Vec<u8> {
        let mut key = COSE_EC2_P256_PREFIX.to_vec();
        key.extend_from_slice(&[x; 32]);
        key.extend_from_slice(&[0x22, 0x58, 0x20]);
        key.extend_from_slice(&[y; 32]);
        key
    }

    /// CBOR attestation object wrapping `auth_data` under the usual
    /// `fmt`/`attStmt`/`authData` map
    #[must_use]
    pub fn attestation_object(auth_data: &[u8]) -> Vec<u8> {
        use ciborium::value::Value;

        let attestation = Value::Map(vec![
            (
                Value::Text("fmt".to_string()),
                Value::Text("none".to_string()),
            ),
            (Value::Text("attStmt".to_string()), Value::Map(Vec::new())),
            (
                Value::Text("authData".to_string()),
                Value::Bytes(auth_data.to_vec()),
            ),
        ]);

        let mut buffer = Vec::new();
        ciborium::ser::into_writer(&attestation, &mut buffer)
            .expect("attestation fixture serializes");
        buffer
    }

    /// Uncompressed SEC 1 point with the given coordinate fill bytes
    #[must_use]
    pub fn uncompressed_point(x: u8, y: u8) -> Vec<u8> {
        let mut point = vec![0x04];
        point.extend_from_slice(&[x; 32]);
        point.extend_from_slice(&[y; 32]);
        point
    }

    /// Credential record matching [`Self::registration_payload`]
    #[must_use]
    pub fn credential_record() -> CredentialRecord {
        let mut record = CredentialRecord::new(
            TEST_CREDENTIAL_ID,
            Self::uncompressed_point(TEST_KEY_X, TEST_KEY_Y),
            TEST_CONTRACT_ID,
        );
        record.transports = Some(vec!["internal".to_string(), "hybrid".to_string()]);
        record
    }

    /// Session record tying the fixture credential to the fixture contract
    #[must_use]
    pub fn session_record() -> SessionRecord {
        SessionRecord {
            contract_id: TEST_CONTRACT_ID.to_string(),
            credential_id: TEST_CREDENTIAL_ID.to_string(),
            connected_at: epoch_millis(),
            expires_at: None,
        }
    }

    /// Credential store over a fresh in-memory backend under the test
    /// namespace
    #[must_use]
    pub fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()), TEST_NAMESPACE)
    }

    fn client_data(ceremony: &str) -> String {
        let json = serde_json::json!({
            "type": ceremony,
            "challenge": "dGVzdC1jaGFsbGVuZ2U",
            "origin": TEST_ORIGIN,
            "crossOrigin": false,
        });
        encode_base64url(json.to_string().as_bytes())
    }
}
