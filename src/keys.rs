//! Key ownership.
//!
//! Symmetric key material lives only in the types defined here. They are
//! opaque, not `Clone`, and zeroised on drop; raw bytes are reachable only
//! inside the crate.
//!
//! ## Key hierarchy
//!
//! ```text
//! password + salt --Argon2id--> KEK --wraps--> MasterKey --encrypts--> vault items
//!                                  \--wraps--> RSA private key
//! ephemeral key (one per share) --encrypts--> shared item
//! recipient RSA public key      --encrypts--> ephemeral key
//! ```

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;

// ---------------------------------------------------------------------------
// Master key
// ---------------------------------------------------------------------------

/// The vault master key. Protects every personal item.
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Construct a `MasterKey` from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Build from an unwrapped buffer, which must be exactly 32 bytes.
    pub(crate) fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = slice.try_into().ok()?;
        Some(Self { bytes })
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Key-encryption key
// ---------------------------------------------------------------------------

/// Key-Encryption-Key derived from the master password.
///
/// Only ever used to wrap or unwrap other keys. Never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Kek {
    bytes: [u8; KEY_LEN],
}

impl Kek {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for Kek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Kek(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Ephemeral sharing key
// ---------------------------------------------------------------------------

/// One-time key protecting a single shared item.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct EphemeralKey {
    bytes: [u8; KEY_LEN],
}

impl EphemeralKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = slice.try_into().ok()?;
        Some(Self { bytes })
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
