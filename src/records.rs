//! Persisted record shapes.
//!
//! These are the only values the storage collaborator ever sees. Byte
//! fields are standard base64 strings; none of them hold a key or plaintext
//! in recoverable form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::EncryptedBlob;
use crate::error::Result;

pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// A user's vault profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub email: String,
    pub salt_kek: String,
    pub encrypted_mk: String,
    pub mk_nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk_nonce: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn wrapped_master_key(&self) -> Result<EncryptedBlob> {
        EncryptedBlob::from_base64_parts(&self.encrypted_mk, &self.mk_nonce)
    }

    /// The sealed private key, if the profile has sharing enabled.
    pub fn wrapped_private_key(&self) -> Result<Option<EncryptedBlob>> {
        match (&self.encrypted_private_key, &self.pk_nonce) {
            (Some(ct), Some(nonce)) => EncryptedBlob::from_base64_parts(ct, nonce).map(Some),
            _ => Ok(None),
        }
    }
}

/// One personal item sealed under the owner's master key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItemRecord {
    pub id: String,
    pub owner_id: String,
    pub ciphertext: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VaultItemRecord {
    /// A new record for `owner_id` holding a blob sealed under their master key.
    pub fn from_sealed(owner_id: &str, blob: &EncryptedBlob) -> Self {
        let (ciphertext, nonce) = blob.to_base64_parts();
        let now = Utc::now();
        Self {
            id: new_record_id(),
            owner_id: owner_id.to_string(),
            ciphertext,
            nonce,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn blob(&self) -> Result<EncryptedBlob> {
        EncryptedBlob::from_base64_parts(&self.ciphertext, &self.nonce)
    }
}

/// One item shared from `sender_id` to `recipient_id`.
///
/// `encrypted_data` and `nonce` are sealed under a one-time key;
/// `encrypted_key` is that key under the recipient's RSA public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedItemRecord {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub encrypted_data: String,
    pub encrypted_key: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
}

impl SharedItemRecord {
    pub fn data_blob(&self) -> Result<EncryptedBlob> {
        EncryptedBlob::from_base64_parts(&self.encrypted_data, &self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_optional_sharing_fields() {
        let json = r#"{
            "id": "u1",
            "email": "a@example.com",
            "salt_kek": "AAAAAAAAAAAAAAAAAAAAAA==",
            "encrypted_mk": "AA==",
            "mk_nonce": "AAAAAAAAAAAAAAAA",
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let profile: ProfileRecord = serde_json::from_str(json).unwrap();
        assert!(profile.public_key.is_none());
        assert!(profile.wrapped_private_key().unwrap().is_none());

        let out = serde_json::to_string(&profile).unwrap();
        assert!(!out.contains("pk_nonce"));
    }

    #[test]
    fn test_item_record_ids_are_unique() {
        let blob = EncryptedBlob {
            ciphertext: vec![1, 2, 3],
            nonce: vec![0; 12],
        };
        let a = VaultItemRecord::from_sealed("owner", &blob);
        let b = VaultItemRecord::from_sealed("owner", &blob);
        assert_ne!(a.id, b.id);
        assert_eq!(a.blob().unwrap(), blob);
    }
}
