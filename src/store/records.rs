//! Persisted record shapes
//!
//! Credential and session records as they are serialized into the flat
//! key-value store. The public key travels as a base64url string inside the
//! JSON value and is restored to raw bytes on load.

use crate::utils::time::epoch_millis;
use serde::{Deserialize, Serialize};

/// One passkey known to the application.
///
/// `credential_id` and `public_key` are immutable after first save; every
/// other field is mutable through [`CredentialUpdate`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CredentialRecord {
    #[serde(rename = "credentialId")]
    pub credential_id: String, // Opaque unique identifier, primary key
    #[serde(rename = "publicKey", with = "base64_bytes")]
    pub public_key: Vec<u8>, // Raw key bytes; base64url in the persisted JSON
    #[serde(rename = "contractId")]
    pub contract_id: String, // Owning account identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>, // User-chosen label
    #[serde(rename = "createdAt")]
    pub created_at: i64, // Epoch milliseconds, set at creation
    #[serde(rename = "lastUsedAt", skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<i64>, // Epoch milliseconds, updated on use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>, // Transport hints from registration
    #[serde(rename = "deviceType", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>, // "singleDevice" or "multiDevice"
    #[serde(rename = "backedUp", skip_serializing_if = "Option::is_none")]
    pub backed_up: Option<bool>, // Whether the key is synced off-device
    #[serde(rename = "contextRuleId", skip_serializing_if = "Option::is_none")]
    pub context_rule_id: Option<i32>, // Application policy rule reference
    #[serde(rename = "isPrimary", skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>, // Preferred credential for the account
    #[serde(rename = "deploymentStatus", skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<String>, // "pending" or "failed"
    #[serde(rename = "deploymentError", skip_serializing_if = "Option::is_none")]
    pub deployment_error: Option<String>, // Failure detail when deployment failed
}

impl CredentialRecord {
    /// Create a record with `created_at` stamped to now and every optional
    /// field absent
    #[must_use]
    pub fn new(
        credential_id: impl Into<String>,
        public_key: Vec<u8>,
        contract_id: impl Into<String>,
    ) -> Self {
        Self {
            credential_id: credential_id.into(),
            public_key,
            contract_id: contract_id.into(),
            nickname: None,
            created_at: epoch_millis(),
            last_used_at: None,
            transports: None,
            device_type: None,
            backed_up: None,
            context_rule_id: None,
            is_primary: None,
            deployment_status: None,
            deployment_error: None,
        }
    }

    /// Merge a partial update over this record.
    ///
    /// Fields set in the update replace the current value; unset fields are
    /// preserved. `credential_id` and `public_key` have no counterpart in
    /// [`CredentialUpdate`] and can never change here.
    pub fn apply(&mut self, update: CredentialUpdate) {
        if let Some(contract_id) = update.contract_id {
            self.contract_id = contract_id;
        }
        if let Some(nickname) = update.nickname {
            self.nickname = Some(nickname);
        }
        if let Some(created_at) = update.created_at {
            self.created_at = created_at;
        }
        if let Some(last_used_at) = update.last_used_at {
            self.last_used_at = Some(last_used_at);
        }
        if let Some(transports) = update.transports {
            self.transports = Some(transports);
        }
        if let Some(device_type) = update.device_type {
            self.device_type = Some(device_type);
        }
        if let Some(backed_up) = update.backed_up {
            self.backed_up = Some(backed_up);
        }
        if let Some(context_rule_id) = update.context_rule_id {
            self.context_rule_id = Some(context_rule_id);
        }
        if let Some(is_primary) = update.is_primary {
            self.is_primary = Some(is_primary);
        }
        if let Some(deployment_status) = update.deployment_status {
            self.deployment_status = Some(deployment_status);
        }
        if let Some(deployment_error) = update.deployment_error {
            self.deployment_error = Some(deployment_error);
        }
    }
}

/// Partial update for a stored credential.
///
/// Deliberately has no `credential_id` or `public_key` member, so those
/// fields cannot be altered through the update path. Unknown keys in a
/// deserialized payload are dropped.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CredentialUpdate {
    #[serde(rename = "contractId", skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(rename = "lastUsedAt", skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
    #[serde(rename = "deviceType", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(rename = "backedUp", skip_serializing_if = "Option::is_none")]
    pub backed_up: Option<bool>,
    #[serde(rename = "contextRuleId", skip_serializing_if = "Option::is_none")]
    pub context_rule_id: Option<i32>,
    #[serde(rename = "isPrimary", skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(rename = "deploymentStatus", skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<String>,
    #[serde(rename = "deploymentError", skip_serializing_if = "Option::is_none")]
    pub deployment_error: Option<String>,
}

/// The single active session for a storage namespace.
///
/// Saving replaces any prior session wholesale; there is no merge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionRecord {
    #[serde(rename = "contractId")]
    pub contract_id: String, // Account the session belongs to
    #[serde(rename = "credentialId")]
    pub credential_id: String, // Credential that authenticated the session
    #[serde(rename = "connectedAt")]
    pub connected_at: i64, // Epoch milliseconds
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>, // Epoch milliseconds, absent for no expiry
}

mod base64_bytes {
    use crate::webauthn::{decode_base64url, encode_base64url};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_base64url(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        decode_base64url(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_serializes_as_base64() {
        let record = CredentialRecord::new("cred-1", vec![0x04, 0xab, 0xcd], "contract-1");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["publicKey"], "BKvN");
        assert!(value.get("nickname").is_none());

        let restored: CredentialRecord = serde_json::from_value(value).unwrap();
        assert_eq!(restored.public_key, vec![0x04, 0xab, 0xcd]);
        assert_eq!(restored, record);
    }

    #[test]
    fn test_record_rejects_invalid_key_encoding() {
        let raw = r#"{"credentialId":"c","publicKey":"!!!","contractId":"a","createdAt":1}"#;
        assert!(serde_json::from_str::<CredentialRecord>(raw).is_err());
    }

    #[test]
    fn test_apply_preserves_unset_fields() {
        let mut record = CredentialRecord::new("cred-1", vec![1, 2, 3], "contract-1");
        record.nickname = Some("laptop".to_string());
        let created_at = record.created_at;

        record.apply(CredentialUpdate {
            last_used_at: Some(42),
            backed_up: Some(true),
            ..CredentialUpdate::default()
        });

        assert_eq!(record.last_used_at, Some(42));
        assert_eq!(record.backed_up, Some(true));
        assert_eq!(record.nickname.as_deref(), Some("laptop"));
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.contract_id, "contract-1");

        // created_at is mutable when asked for, unlike the identity fields
        record.apply(CredentialUpdate {
            created_at: Some(7),
            ..CredentialUpdate::default()
        });
        assert_eq!(record.created_at, 7);
    }

    #[test]
    fn test_update_payload_drops_immutable_keys() {
        // credentialId and publicKey have no member to land in
        let update: CredentialUpdate = serde_json::from_str(
            r#"{"credentialId":"evil","publicKey":"BBBB","nickname":"phone"}"#,
        )
        .unwrap();
        assert_eq!(update.nickname.as_deref(), Some("phone"));

        let mut record = CredentialRecord::new("cred-1", vec![9], "contract-1");
        record.apply(update);
        assert_eq!(record.credential_id, "cred-1");
        assert_eq!(record.public_key, vec![9]);
    }

    #[test]
    fn test_session_round_trip() {
        let session = SessionRecord {
            contract_id: "contract-1".to_string(),
            credential_id: "cred-1".to_string(),
            connected_at: 1_700_000_000_000,
            expires_at: None,
        };
        let raw = serde_json::to_string(&session).unwrap();
        assert!(!raw.contains("expiresAt"));
        let restored: SessionRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, session);
    }
}
