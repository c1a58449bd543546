//! Hybrid envelope sharing.
//!
//! Moves one item from a sender's vault to a recipient without exposing
//! plaintext to storage:
//! 1. Open the item under the sender's master key
//! 2. Seal the plaintext under a fresh one-time key
//! 3. Seal the one-time key under the recipient's RSA-OAEP public key
//!
//! The plaintext and the one-time key exist only within the scope of
//! `share` and `receive`, and both are zeroised before returning. Each share
//! uses its own key, so exposing one shared item's key exposes nothing else.
//!
//! A record that cannot be opened fails with `DecryptionFailure` whether the
//! damage is in the base64 framing or in the ciphertext itself.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::asymmetric;
use crate::codec::{self, ItemFields};
use crate::crypto;
use crate::error::{Result, VaultError};
use crate::keys::{EphemeralKey, MasterKey};
use crate::records::{self, SharedItemRecord, VaultItemRecord};

/// Re-encrypt `item` for `recipient_id`.
///
/// Fails with `DecryptionFailure` if the item is malformed or cannot be
/// opened under `master`; nothing is produced in that case.
pub fn share(
    master: &MasterKey,
    item: &VaultItemRecord,
    sender_id: &str,
    recipient_id: &str,
    recipient_public_key: &RsaPublicKey,
) -> Result<SharedItemRecord> {
    // Phase 1: open under the sender's master key.
    let blob = item.blob().map_err(|_| VaultError::DecryptionFailure)?;
    let plaintext = crypto::open(&blob, master.as_bytes())?;

    // Phase 2: seal under a one-time key.
    let ephemeral = EphemeralKey::from_bytes(crypto::generate_random_key()?);
    let sealed = crypto::encrypt(&plaintext, ephemeral.as_bytes())?;

    // Phase 3: hand the one-time key to the recipient.
    let encrypted_key = asymmetric::encrypt_key(recipient_public_key, ephemeral.as_bytes())?;

    let (encrypted_data, nonce) = sealed.to_base64_parts();
    Ok(SharedItemRecord {
        id: records::new_record_id(),
        sender_id: sender_id.to_string(),
        recipient_id: recipient_id.to_string(),
        encrypted_data,
        encrypted_key: STANDARD.encode(encrypted_key),
        nonce,
        created_at: Utc::now(),
    })
}

/// Open a shared item with the recipient's private key.
pub fn receive(private_key: &RsaPrivateKey, record: &SharedItemRecord) -> Result<ItemFields> {
    let encrypted_key =
        crypto::decode_b64(&record.encrypted_key).map_err(|_| VaultError::DecryptionFailure)?;
    let key_bytes = asymmetric::decrypt_key(private_key, &encrypted_key)?;
    let ephemeral = EphemeralKey::from_slice(&key_bytes).ok_or(VaultError::DecryptionFailure)?;

    let blob = record
        .data_blob()
        .map_err(|_| VaultError::DecryptionFailure)?;
    let plaintext = crypto::open(&blob, ephemeral.as_bytes())?;
    codec::deserialize(&plaintext)
}
