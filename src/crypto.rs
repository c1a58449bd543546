//! Symmetric cipher service.
//!
//! This module and `kdf` are the only places that touch symmetric
//! primitives directly. Everything that wraps a key or seals an item goes
//! through `encrypt` and `decrypt` here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM, no associated data
//! - **Nonce**: 96-bit, drawn fresh from `SystemRandom` on every call
//! - **Key size**: 256 bits
//!
//! Nonces are purely random. There is no per-key counter, so concurrent
//! callers need no coordination. The birthday bound on 96-bit random nonces
//! applies at very high per-key volumes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// The AEAD algorithm used throughout zkvault.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of every symmetric key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of a single encryption call.
///
/// Serializes with both fields as standard base64 strings, the shape the
/// storage layer persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Ciphertext with the GCM tag appended.
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
    /// Nonce used for this call only.
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
}

impl EncryptedBlob {
    /// Base64 forms of `(ciphertext, nonce)` for a storage record.
    pub fn to_base64_parts(&self) -> (String, String) {
        (STANDARD.encode(&self.ciphertext), STANDARD.encode(&self.nonce))
    }

    /// Rebuild a blob from the base64 fields of a storage record.
    pub fn from_base64_parts(ciphertext: &str, nonce: &str) -> Result<Self> {
        Ok(Self {
            ciphertext: decode_b64(ciphertext)?,
            nonce: decode_b64(nonce)?,
        })
    }
}

/// Decode a standard base64 string from a storage record.
pub(crate) fn decode_b64(value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| VaultError::Encoding(e.to_string()))
}

/// Fill `buf` from the system CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| VaultError::RandomnessFailure)
}

fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut buf = [0u8; NONCE_LEN];
    fill_random(&mut buf)?;
    Ok(buf)
}

fn load_key(key_bytes: &[u8; KEY_LEN]) -> Result<LessSafeKey> {
    let unbound = UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| VaultError::InvalidKey)?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key_bytes` with a fresh random nonce.
pub fn encrypt(plaintext: &[u8], key_bytes: &[u8; KEY_LEN]) -> Result<EncryptedBlob> {
    let key = load_key(key_bytes)?;
    let nonce_bytes = generate_nonce()?;

    let mut in_out = Vec::with_capacity(plaintext.len() + ALGORITHM.tag_len());
    in_out.extend_from_slice(plaintext);

    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| VaultError::EncryptionFailure)?;

    Ok(EncryptedBlob {
        ciphertext: in_out,
        nonce: nonce_bytes.to_vec(),
    })
}

/// Decrypt `ciphertext` produced by [`encrypt`] under the same key and nonce.
///
/// Wrong key, flipped bits in ciphertext, tag or nonce, a nonce of the
/// wrong length and truncated input all return `DecryptionFailure`. No
/// partial plaintext is ever returned. The working buffer is the returned
/// buffer and is zeroised on drop, on the error path too.
pub fn decrypt(
    ciphertext: &[u8],
    key_bytes: &[u8; KEY_LEN],
    nonce: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let nonce: [u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| VaultError::DecryptionFailure)?;
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::DecryptionFailure);
    }

    let key = load_key(key_bytes)?;
    let mut payload = Zeroizing::new(ciphertext.to_vec());

    let len = key
        .open_in_place(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut payload[..])
        .map_err(|_| VaultError::DecryptionFailure)?
        .len();
    payload.truncate(len);

    Ok(payload)
}

/// Decrypt a whole [`EncryptedBlob`].
pub fn open(blob: &EncryptedBlob, key_bytes: &[u8; KEY_LEN]) -> Result<Zeroizing<Vec<u8>>> {
    decrypt(&blob.ciphertext, key_bytes, &blob.nonce)
}

/// Generate a cryptographically secure random 256-bit key.
pub fn generate_random_key() -> Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    fill_random(&mut key)?;
    Ok(key)
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}
