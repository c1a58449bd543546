//! Password-based key derivation.
//!
//! Argon2id turns the master password and the profile salt into the KEK.
//! The derivation is deterministic and intentionally slow and memory-hard;
//! callers should run it off interactive threads.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::KdfParams;
use crate::crypto::{self, KEY_LEN};
use crate::error::{Result, VaultError};
use crate::keys::Kek;

/// Length of a freshly generated salt.
pub const SALT_LEN: usize = 16;

/// Shortest salt `derive_kek` accepts.
pub const MIN_SALT_LEN: usize = 16;

/// Generate a random per-user salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    crypto::fill_random(&mut salt)?;
    Ok(salt)
}

/// Derive the Key-Encryption-Key from a password and salt.
///
/// Empty passwords are accepted. Salts shorter than [`MIN_SALT_LEN`] are
/// rejected.
pub fn derive_kek(password: &str, salt: &[u8], params: &KdfParams) -> Result<Kek> {
    if salt.len() < MIN_SALT_LEN {
        return Err(VaultError::KeyDerivation(format!(
            "salt must be at least {MIN_SALT_LEN} bytes"
        )));
    }

    let params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

    Ok(Kek::from_bytes(output))
}
