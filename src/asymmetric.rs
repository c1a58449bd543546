//! Sharing key pair management.
//!
//! Each user holds one RSA-2048 key pair used with OAEP/SHA-256. The public
//! key is stored in plaintext (base64 SPKI DER). The private key is stored as
//! PKCS#8 DER sealed under the same KEK that wraps the master key, so one
//! password opens both.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::crypto::{self, EncryptedBlob};
use crate::error::{Result, VaultError};
use crate::keys::Kek;

/// Modulus size of every sharing key pair.
pub const RSA_BITS: usize = 2048;

/// A user's sharing identity. The private half zeroises itself on drop.
pub struct SharingKeyPair {
    pub public: RsaPublicKey,
    pub private: RsaPrivateKey,
}

/// Generate a fresh RSA-2048 key pair (public exponent 65537).
///
/// This is slow (hundreds of milliseconds in release builds).
pub fn generate_key_pair() -> Result<SharingKeyPair> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_BITS)
        .map_err(|e| VaultError::KeyGeneration(e.to_string()))?;
    let public = RsaPublicKey::from(&private);
    Ok(SharingKeyPair { public, private })
}

/// Serialize a public key for plaintext storage.
pub fn export_public_key(public: &RsaPublicKey) -> Result<String> {
    let der = public
        .to_public_key_der()
        .map_err(|e| VaultError::KeyGeneration(e.to_string()))?;
    Ok(STANDARD.encode(der.as_bytes()))
}

/// Parse a public key produced by [`export_public_key`].
pub fn import_public_key(encoded: &str) -> Result<RsaPublicKey> {
    let der = crypto::decode_b64(encoded)?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| VaultError::Encoding(e.to_string()))
}

/// Serialize the private key and seal it under the KEK.
pub fn export_private_key(private: &RsaPrivateKey, kek: &Kek) -> Result<EncryptedBlob> {
    let der = private
        .to_pkcs8_der()
        .map_err(|e| VaultError::KeyGeneration(e.to_string()))?;
    crypto::encrypt(der.as_bytes(), kek.as_bytes())
}

/// Open a private key sealed by [`export_private_key`].
///
/// A wrong KEK or tampered blob yields `DecryptionFailure`.
pub fn import_private_key(blob: &EncryptedBlob, kek: &Kek) -> Result<RsaPrivateKey> {
    let der = crypto::open(blob, kek.as_bytes())?;
    RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| VaultError::Encoding(e.to_string()))
}

/// RSA-OAEP/SHA-256 encrypt a short secret (a symmetric key) to `public`.
pub fn encrypt_key(public: &RsaPublicKey, key_bytes: &[u8]) -> Result<Vec<u8>> {
    public
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key_bytes)
        .map_err(|_| VaultError::EncryptionFailure)
}

/// RSA-OAEP/SHA-256 decrypt a secret encrypted by [`encrypt_key`].
pub fn decrypt_key(private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    private
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::DecryptionFailure)
}
