//! Binary codec for `WebAuthn` wire strings
//!
//! Native credential providers hand every binary field across the boundary as
//! an unpadded base64url string. This module owns the conversion between those
//! opaque wire strings and raw byte buffers, plus the byte-level scanning the
//! key-recovery engine builds on.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Encode a byte buffer as an unpadded base64url string.
///
/// Handles buffers of arbitrary length; the encoder accumulates byte-by-byte
/// and never recurses.
#[must_use]
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url string back into a byte buffer.
///
/// Reconstructs standard padding (appending `=` until the length is a
/// multiple of 4), reverses the URL-safe alphabet substitution and decodes
/// with the standard alphabet. Input that already carries standard-alphabet
/// characters decodes as well, since the substitution is a no-op for it.
///
/// # Errors
/// Returns a [`base64::DecodeError`] if the input contains characters outside
/// the alphabet after substitution, or has an impossible length.
pub fn decode_base64url(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut normalized = input.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    STANDARD.decode(normalized)
}

/// Find the first occurrence of `needle` in `haystack`.
///
/// Deterministic forward linear scan; used to locate the fixed COSE EC2-key
/// prefix inside an attestation buffer. An empty needle matches at offset 0.
#[must_use]
pub fn scan_for_byte_pattern(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Read a big-endian u16 field out of a byte buffer.
///
/// Returns `None` when fewer than two bytes remain at `offset`.
#[must_use]
pub fn read_u16_be(bytes: &[u8], offset: usize) -> Option<u16> {
    let high = *bytes.get(offset)?;
    let low = *bytes.get(offset + 1)?;
    Some(u16::from_be_bytes([high, low]))
}
