//! Error taxonomy for credential operations
//!
//! Native providers report failures with their own platform codes. Relying
//! parties expect DOM-style exception names. This module maps the provider
//! taxonomy onto the DOM one while carrying the original provider code
//! through unmodified, so callers can still branch on it.

use serde::{Serialize, Serializer};
use std::fmt;

/// DOM-style exception names surfaced to relying parties.
///
/// Variants carry no suffix; [`DomErrorName::as_str`] yields the canonical
/// DOM spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomErrorName {
    Abort,
    InvalidState,
    NotAllowed,
    NotSupported,
    Security,
    Type,
    Unknown,
}

impl DomErrorName {
    /// Canonical DOM exception name for this variant
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DomErrorName::Abort => "AbortError",
            DomErrorName::InvalidState => "InvalidStateError",
            DomErrorName::NotAllowed => "NotAllowedError",
            DomErrorName::NotSupported => "NotSupportedError",
            DomErrorName::Security => "SecurityError",
            DomErrorName::Type => "TypeError",
            DomErrorName::Unknown => "UnknownError",
        }
    }
}

impl fmt::Display for DomErrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DomErrorName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A failure as reported by a native credential provider
#[derive(Debug, Clone, serde::Deserialize, Serialize)]
pub struct ProviderFailure {
    /// Platform failure code, e.g. `CANCELLED` or `RPID_VALIDATION_ERROR`
    pub code: String,

    /// Free-form description attached by the provider, if any
    pub message: Option<String>,
}

impl ProviderFailure {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.code),
            None => f.write_str(&self.code),
        }
    }
}

impl std::error::Error for ProviderFailure {}

/// A credential operation failure in relying-party terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialError {
    /// DOM-style exception name
    pub name: DomErrorName,

    /// Human-readable description
    pub message: String,

    /// Provider failure code exactly as received
    pub code: String,
}

impl CredentialError {
    /// Error for a payload the broker itself rejects as malformed
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            name: DomErrorName::Type,
            message: message.into(),
            code: "INVALID_INPUT".to_string(),
        }
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for CredentialError {}

impl From<ProviderFailure> for CredentialError {
    fn from(failure: ProviderFailure) -> Self {
        map_provider_failure(&failure.code, failure.message.as_deref())
    }
}

/// Scan order for classifying `DOM_ERROR` messages. First name found as a
/// substring wins, so the more specific names come first.
const DOM_ERROR_SCAN_ORDER: [DomErrorName; 7] = [
    DomErrorName::Security,
    DomErrorName::NotSupported,
    DomErrorName::InvalidState,
    DomErrorName::Abort,
    DomErrorName::Type,
    DomErrorName::Unknown,
    DomErrorName::NotAllowed,
];

/// Map a provider failure code onto a relying-party error.
///
/// Unrecognized codes map to `UnknownError`. The code itself is preserved
/// unmodified on the returned error regardless of how it classified.
#[must_use]
pub fn map_provider_failure(code: &str, message: Option<&str>) -> CredentialError {
    let name = match code {
        "UNKNOWN_ERROR" => DomErrorName::Unknown,
        "CANCELLED" | "NO_CREDENTIAL" => DomErrorName::NotAllowed,
        "DOM_ERROR" => classify_dom_error_message(message),
        "UNSUPPORTED_ERROR" => DomErrorName::NotSupported,
        "TIMEOUT" | "INTERRUPTED" => DomErrorName::Abort,
        "INVALID_INPUT" => DomErrorName::Type,
        "RPID_VALIDATION_ERROR" => DomErrorName::Security,
        "PROVIDER_CONFIG_ERROR" | "NO_ACTIVITY" => DomErrorName::InvalidState,
        _ => DomErrorName::Unknown,
    };

    let message = match message {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => format!("Credential provider reported {code}"),
    };

    CredentialError {
        name,
        message,
        code: code.to_string(),
    }
}

/// `DOM_ERROR` means the provider relayed a browser-side DOMException and
/// flattened it into the message. Recover the original name by scanning the
/// message for each canonical name; default to `NotAllowedError`, the most
/// common DOMException in credential flows.
fn classify_dom_error_message(message: Option<&str>) -> DomErrorName {
    let Some(message) = message else {
        return DomErrorName::NotAllowed;
    };

    DOM_ERROR_SCAN_ORDER
        .into_iter()
        .find(|name| message.contains(name.as_str()))
        .unwrap_or(DomErrorName::NotAllowed)
}
