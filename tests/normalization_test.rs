// Integration tests for credential payload normalization and error mapping
use bridgrs::testing::constants::{TEST_CREDENTIAL_ID, TEST_KEY_X, TEST_KEY_Y};
use bridgrs::testing::TestFixtures;
use bridgrs::webauthn::{
    encode_base64url, map_provider_failure, normalize_authentication, normalize_registration,
    CredentialError, DomErrorName, ProviderFailure,
};

/// Test that a raw registration payload comes out in canonical shape
#[test]
fn test_registration_payload_normalizes_end_to_end() {
    let normalized = normalize_registration(TestFixtures::registration_payload())
        .expect("Fixture payload should normalize");

    assert_eq!(normalized.id, TEST_CREDENTIAL_ID);
    assert_eq!(normalized.raw_id, TEST_CREDENTIAL_ID);
    assert_eq!(normalized.r#type, "public-key");
    assert_eq!(
        normalized.authenticator_attachment,
        Some("platform".to_string())
    );
    assert_eq!(
        normalized.client_extension_results,
        serde_json::json!({}),
        "Missing extension results should become an empty object"
    );
    assert_eq!(
        normalized.response.transports,
        Some(vec!["internal".to_string(), "hybrid".to_string()])
    );
    assert_eq!(normalized.response.public_key_algorithm, Some(-7));
}

/// Test that the missing public key is rebuilt from authenticator data
#[test]
fn test_registration_recovers_public_key_from_authenticator_data() {
    let normalized = normalize_registration(TestFixtures::registration_payload())
        .expect("Fixture payload should normalize");

    let expected = encode_base64url(&TestFixtures::uncompressed_point(TEST_KEY_X, TEST_KEY_Y));
    assert_eq!(normalized.response.public_key, Some(expected));
}

/// Test that an explicit provider key is kept verbatim
#[test]
fn test_explicit_public_key_wins_over_recovery() {
    let explicit = encode_base64url(&TestFixtures::uncompressed_point(0x11, 0x22));
    let mut payload = TestFixtures::registration_payload();
    payload.response.as_mut().unwrap().public_key = Some(explicit.clone());

    let normalized = normalize_registration(payload).expect("Payload should normalize");
    assert_eq!(normalized.response.public_key, Some(explicit));
}

/// Test that an empty explicit key falls through to recovery
#[test]
fn test_empty_public_key_field_is_treated_as_absent() {
    let mut payload = TestFixtures::registration_payload();
    payload.response.as_mut().unwrap().public_key = Some(String::new());

    let normalized = normalize_registration(payload).expect("Payload should normalize");
    let expected = encode_base64url(&TestFixtures::uncompressed_point(TEST_KEY_X, TEST_KEY_Y));
    assert_eq!(normalized.response.public_key, Some(expected));
}

/// Test the attestation-object scan when no authenticator data is present
#[test]
fn test_attestation_scan_recovers_key_without_authenticator_data() {
    let mut payload = TestFixtures::registration_payload();
    payload.response.as_mut().unwrap().authenticator_data = None;

    let normalized = normalize_registration(payload).expect("Payload should normalize");
    let expected = encode_base64url(&TestFixtures::uncompressed_point(TEST_KEY_X, TEST_KEY_Y));
    assert_eq!(normalized.response.public_key, Some(expected));
}

/// Test that a payload with no key source normalizes without a key
#[test]
fn test_registration_without_key_material_keeps_no_key() {
    let mut payload = TestFixtures::registration_payload();
    {
        let response = payload.response.as_mut().unwrap();
        response.authenticator_data = None;
        response.attestation_object = Some(encode_base64url(b"not an attestation object"));
    }

    let normalized = normalize_registration(payload).expect("Payload should normalize");
    assert_eq!(normalized.response.public_key, None);
}

/// Test that dropping a mandatory member fails as a type error
#[test]
fn test_missing_client_data_is_rejected() {
    let mut payload = TestFixtures::registration_payload();
    payload.response.as_mut().unwrap().client_data_json = None;

    let err = normalize_registration(payload).expect_err("Payload should be rejected");
    assert_eq!(err.name, DomErrorName::Type);
    assert_eq!(err.code, "INVALID_INPUT");
}

/// Test that an assertion payload normalizes with its user handle decoded
#[test]
fn test_authentication_payload_normalizes_end_to_end() {
    let normalized = normalize_authentication(TestFixtures::authentication_payload())
        .expect("Fixture payload should normalize");

    assert_eq!(normalized.id, TEST_CREDENTIAL_ID);
    assert_eq!(normalized.r#type, "public-key");
    assert!(normalized.response.user_handle.is_some());
    assert!(!normalized.response.signature.is_empty());
}

/// Test that sentinel user handles collapse to absence
#[test]
fn test_user_handle_sentinels_collapse() {
    for sentinel in ["null", "undefined", ""] {
        let mut payload = TestFixtures::authentication_payload();
        payload.response.as_mut().unwrap().user_handle = Some(sentinel.to_string());

        let normalized = normalize_authentication(payload).expect("Payload should normalize");
        assert_eq!(
            normalized.response.user_handle, None,
            "user handle {sentinel:?} should read as absent"
        );
    }
}

/// Test the serialized wire shape of a normalized registration
#[test]
fn test_normalized_registration_serializes_with_wire_names() {
    let normalized = normalize_registration(TestFixtures::registration_payload())
        .expect("Fixture payload should normalize");
    let json = serde_json::to_value(&normalized).expect("Response should serialize");

    assert!(json.get("rawId").is_some());
    assert!(json.get("clientExtensionResults").is_some());
    assert!(json.get("authenticatorAttachment").is_some());

    let response = json.get("response").expect("response member");
    assert!(response.get("clientDataJSON").is_some());
    assert!(response.get("attestationObject").is_some());
    assert!(response.get("publicKey").is_some());
    assert!(response.get("publicKeyAlgorithm").is_some());
}

/// Test the provider failure code table end to end
#[test]
fn test_provider_failure_codes_map_to_dom_errors() {
    let cases = [
        ("UNKNOWN_ERROR", DomErrorName::Unknown),
        ("CANCELLED", DomErrorName::NotAllowed),
        ("NO_CREDENTIAL", DomErrorName::NotAllowed),
        ("UNSUPPORTED_ERROR", DomErrorName::NotSupported),
        ("TIMEOUT", DomErrorName::Abort),
        ("INTERRUPTED", DomErrorName::Abort),
        ("INVALID_INPUT", DomErrorName::Type),
        ("RPID_VALIDATION_ERROR", DomErrorName::Security),
        ("PROVIDER_CONFIG_ERROR", DomErrorName::InvalidState),
        ("NO_ACTIVITY", DomErrorName::InvalidState),
        ("SOMETHING_NEW", DomErrorName::Unknown),
    ];

    for (code, expected) in cases {
        let err = map_provider_failure(code, Some("provider says no"));
        assert_eq!(err.name, expected, "code {code} should map to {expected}");
        assert_eq!(err.code, code, "original code should ride along");
    }
}

/// Test that DOM_ERROR classification scans the message text
#[test]
fn test_dom_error_message_scan() {
    let err = map_provider_failure("DOM_ERROR", Some("NotSupportedError: no platform support"));
    assert_eq!(err.name, DomErrorName::NotSupported);

    let fallback = map_provider_failure("DOM_ERROR", Some("no recognizable name here"));
    assert_eq!(fallback.name, DomErrorName::NotAllowed);
}

/// Test the failure-to-error conversion carries a placeholder message
#[test]
fn test_failure_without_message_gets_placeholder() {
    let err = CredentialError::from(ProviderFailure {
        code: "CANCELLED".to_string(),
        message: None,
    });
    assert_eq!(err.message, "Credential provider reported CANCELLED");
}
