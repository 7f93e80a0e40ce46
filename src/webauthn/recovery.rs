//! Public-key recovery for `WebAuthn` registration responses
//!
//! Some native providers omit the parsed public key from their registration
//! payload and only ship the raw authenticator data or attestation object.
//! Relying parties still expect a key, so this module recovers the credential
//! public key from whichever binary source is available, in a fixed priority
//! order:
//!
//! 1. an explicit public-key field on the provider payload, used verbatim
//! 2. structural extraction from the authenticator data
//! 3. a byte scan of the attestation object for the COSE EC2 key prefix
//!
//! A stage that cannot produce a key falls through to the next; when every
//! stage fails the key is simply absent and the response is passed along
//! without one.

use crate::webauthn::codec::{decode_base64url, read_u16_be, scan_for_byte_pattern};

// Authenticator data layout (WebAuthn §6.1):
// - 32 bytes: RP ID hash
// - 1 byte: flags
// - 4 bytes: signature counter
// - 16 bytes: AAGUID
// - 2 bytes: credential ID length (big-endian)
// - L bytes: credential ID
// - variable: COSE public key
const RP_ID_HASH_LEN: usize = 32;
const FLAGS_LEN: usize = 1;
const SIGN_COUNT_LEN: usize = 4;
const AAGUID_LEN: usize = 16;
const CREDENTIAL_ID_LEN_FIELD: usize = 2;

/// Offset of the big-endian credential ID length field.
const CREDENTIAL_ID_LEN_OFFSET: usize =
    RP_ID_HASH_LEN + FLAGS_LEN + SIGN_COUNT_LEN + AAGUID_LEN;

/// Fixed header length preceding the credential ID itself.
const ATTESTED_HEADER_LEN: usize = CREDENTIAL_ID_LEN_OFFSET + CREDENTIAL_ID_LEN_FIELD;

/// Canonical CTAP2 CBOR prefix of a P-256 EC2 COSE key, up through the
/// byte-string header of the x coordinate: a5 (map of 5) 01 02 (kty: EC2)
/// 03 26 (alg: ES256) 20 01 (crv: P-256) 21 58 20 (x: 32-byte bstr).
pub const COSE_EC2_P256_PREFIX: [u8; 10] =
    [0xa5, 0x01, 0x02, 0x03, 0x26, 0x20, 0x01, 0x21, 0x58, 0x20];

/// Length of each affine coordinate on P-256.
const COORDINATE_LEN: usize = 32;

/// CBOR overhead between the x and y coordinates: 22 58 20
/// (y label plus 32-byte bstr header).
const Y_LABEL_OVERHEAD: usize = 3;

/// Distance from the start of x to the start of y.
const X_TO_Y_STRIDE: usize = COORDINATE_LEN + Y_LABEL_OVERHEAD;

/// SEC 1 tag for an uncompressed elliptic-curve point.
const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Recover the credential public key from a registration response.
///
/// Tries each binary source in priority order; a source whose decode or
/// structural extraction fails falls through to the next. An empty explicit
/// field is treated as absent. Returns `None` when no source yields a key.
#[must_use]
pub fn recover_public_key(
    explicit_key_b64: Option<&str>,
    authenticator_data_b64: Option<&str>,
    attestation_object_b64: Option<&str>,
) -> Option<Vec<u8>> {
    if let Some(explicit) = explicit_key_b64.filter(|s| !s.is_empty()) {
        match decode_base64url(explicit) {
            Ok(key) => return Some(key),
            Err(e) => log::debug!("Explicit public key field did not decode: {e}"),
        }
    }

    if let Some(auth_data_b64) = authenticator_data_b64 {
        match decode_base64url(auth_data_b64) {
            Ok(auth_data) => {
                if let Some(key) = extract_public_key_from_authenticator_data(&auth_data) {
                    return Some(key);
                }
                log::debug!("Authenticator data present but no key could be extracted");
            }
            Err(e) => log::debug!("Authenticator data did not decode: {e}"),
        }
    }

    if let Some(attestation_b64) = attestation_object_b64 {
        match decode_base64url(attestation_b64) {
            Ok(attestation) => {
                if let Some(key) = extract_public_key_from_attestation(&attestation) {
                    return Some(key);
                }
                log::debug!("Attestation object present but no key could be extracted");
            }
            Err(e) => log::debug!("Attestation object did not decode: {e}"),
        }
    }

    None
}

/// Extract an uncompressed P-256 point from raw authenticator data.
///
/// Walks the fixed attested-credential layout: reads the credential ID
/// length behind the AAGUID, skips the credential ID and the COSE map
/// prefix, then slices the x and y coordinates directly. Returns `None`
/// when the buffer is too short for any of those reads.
#[must_use]
pub fn extract_public_key_from_authenticator_data(auth_data: &[u8]) -> Option<Vec<u8>> {
    let credential_id_len = usize::from(read_u16_be(auth_data, CREDENTIAL_ID_LEN_OFFSET)?);

    let x_start = ATTESTED_HEADER_LEN + credential_id_len + COSE_EC2_P256_PREFIX.len();
    let y_start = x_start + X_TO_Y_STRIDE;

    let x = auth_data.get(x_start..x_start + COORDINATE_LEN)?;
    let y = auth_data.get(y_start..y_start + COORDINATE_LEN)?;

    Some(assemble_uncompressed_point(x, y))
}

/// Extract an uncompressed P-256 point from a raw attestation object.
///
/// Does not parse the CBOR envelope. Scans the buffer for the canonical
/// EC2 key prefix and slices the coordinates at fixed distances behind it.
/// Returns `None` when the prefix is absent or the buffer ends before the
/// y coordinate does.
#[must_use]
pub fn extract_public_key_from_attestation(attestation: &[u8]) -> Option<Vec<u8>> {
    let prefix_pos = scan_for_byte_pattern(attestation, &COSE_EC2_P256_PREFIX)?;
    let x_start = prefix_pos + COSE_EC2_P256_PREFIX.len();
    let y_start = x_start + X_TO_Y_STRIDE;

    let x = attestation.get(x_start..x_start + COORDINATE_LEN)?;
    let y = attestation.get(y_start..y_start + COORDINATE_LEN)?;

    Some(assemble_uncompressed_point(x, y))
}

fn assemble_uncompressed_point(x: &[u8], y: &[u8]) -> Vec<u8> {
    let mut point = Vec::with_capacity(1 + COORDINATE_LEN * 2);
    point.push(UNCOMPRESSED_POINT_TAG);
    point.extend_from_slice(x);
    point.extend_from_slice(y);
    point
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::codec::encode_base64url;

    fn cose_key_bytes(x: u8, y: u8) -> Vec<u8> {
        let mut key = COSE_EC2_P256_PREFIX.to_vec();
        key.extend_from_slice(&[x; 32]);
        key.extend_from_slice(&[0x22, 0x58, 0x20]);
        key.extend_from_slice(&[y; 32]);
        key
    }

    fn auth_data_with_key(credential_id_len: usize, x: u8, y: u8) -> Vec<u8> {
        let mut data = vec![0u8; ATTESTED_HEADER_LEN + credential_id_len];
        data[CREDENTIAL_ID_LEN_OFFSET] = u8::try_from(credential_id_len >> 8).unwrap();
        data[CREDENTIAL_ID_LEN_OFFSET + 1] = u8::try_from(credential_id_len & 0xff).unwrap();
        data.extend_from_slice(&cose_key_bytes(x, y));
        data
    }

    fn assert_point(key: &[u8], x: u8, y: u8) {
        assert_eq!(key.len(), 65);
        assert_eq!(key[0], 0x04);
        assert_eq!(&key[1..33], &[x; 32]);
        assert_eq!(&key[33..65], &[y; 32]);
    }

    #[test]
    fn test_extract_from_authenticator_data() {
        let auth_data = auth_data_with_key(16, 0xaa, 0xbb);
        let key = extract_public_key_from_authenticator_data(&auth_data).unwrap();
        assert_point(&key, 0xaa, 0xbb);
    }

    #[test]
    fn test_extract_handles_long_credential_id() {
        // Two-byte length field: 300 does not fit in one byte
        let auth_data = auth_data_with_key(300, 0x11, 0x22);
        let key = extract_public_key_from_authenticator_data(&auth_data).unwrap();
        assert_point(&key, 0x11, 0x22);
    }

    #[test]
    fn test_extract_rejects_truncated_authenticator_data() {
        let full = auth_data_with_key(16, 0xaa, 0xbb);
        // Header only, no key material
        assert_eq!(
            extract_public_key_from_authenticator_data(&full[..ATTESTED_HEADER_LEN + 16]),
            None
        );
        // One byte short of the y coordinate
        assert_eq!(
            extract_public_key_from_authenticator_data(&full[..full.len() - 1]),
            None
        );
        // Too short for even the length field
        assert_eq!(extract_public_key_from_authenticator_data(&[0u8; 40]), None);
        assert_eq!(extract_public_key_from_authenticator_data(&[]), None);
    }

    #[test]
    fn test_extract_from_attestation_scan() {
        let mut attestation = vec![0x58, 0x99, 0x01];
        attestation.extend_from_slice(&cose_key_bytes(0xcc, 0xdd));
        attestation.extend_from_slice(&[0xff; 7]);
        let key = extract_public_key_from_attestation(&attestation).unwrap();
        assert_point(&key, 0xcc, 0xdd);
    }

    #[test]
    fn test_attestation_scan_length_boundary() {
        // Exactly 67 bytes after the prefix is enough; one less is not
        let attestation = cose_key_bytes(0x01, 0x02);
        assert!(extract_public_key_from_attestation(&attestation).is_some());
        assert_eq!(
            extract_public_key_from_attestation(&attestation[..attestation.len() - 1]),
            None
        );
    }

    #[test]
    fn test_attestation_scan_missing_prefix() {
        assert_eq!(extract_public_key_from_attestation(&[0u8; 128]), None);
    }

    #[test]
    fn test_explicit_key_wins() {
        let auth_data = auth_data_with_key(16, 0xaa, 0xbb);
        let key = recover_public_key(
            Some(&encode_base64url(&[0x04, 0x99])),
            Some(&encode_base64url(&auth_data)),
            None,
        )
        .unwrap();
        assert_eq!(key, vec![0x04, 0x99]);
    }

    #[test]
    fn test_undecodable_explicit_key_falls_through() {
        let auth_data = auth_data_with_key(16, 0xaa, 0xbb);
        let key = recover_public_key(
            Some("!!!not-base64!!!"),
            Some(&encode_base64url(&auth_data)),
            None,
        )
        .unwrap();
        assert_point(&key, 0xaa, 0xbb);
    }

    #[test]
    fn test_empty_explicit_key_treated_as_absent() {
        let auth_data = auth_data_with_key(4, 0x55, 0x66);
        let key =
            recover_public_key(Some(""), Some(&encode_base64url(&auth_data)), None).unwrap();
        assert_point(&key, 0x55, 0x66);
    }

    #[test]
    fn test_short_authenticator_data_falls_through_to_attestation() {
        let mut attestation = vec![0x00; 5];
        attestation.extend_from_slice(&cose_key_bytes(0xcc, 0xdd));
        let key = recover_public_key(
            None,
            Some(&encode_base64url(&[0u8; 37])),
            Some(&encode_base64url(&attestation)),
        )
        .unwrap();
        assert_point(&key, 0xcc, 0xdd);
    }

    #[test]
    fn test_all_sources_exhausted_yields_none() {
        assert_eq!(recover_public_key(None, None, None), None);
        assert_eq!(
            recover_public_key(None, Some("@@@"), Some(&encode_base64url(&[0u8; 8]))),
            None
        );
    }
}
