//! Master key lifecycle.
//!
//! Generates, wraps and unwraps the vault master key and moves a caller's
//! [`Session`] between Locked and Unlocked.

use tracing::{info, warn};

use crate::asymmetric::{self, SharingKeyPair};
use crate::config::KdfParams;
use crate::crypto::{self, EncryptedBlob};
use crate::error::{Result, VaultError};
use crate::kdf::{self, SALT_LEN};
use crate::keys::{Kek, MasterKey};
use crate::session::Session;

/// Exported sharing key pair, ready to persist.
#[derive(Debug, Clone)]
pub struct KeyPairMaterial {
    /// Base64 SPKI DER public key.
    pub public_key: String,
    /// PKCS#8 private key sealed under the KEK.
    pub encrypted_private_key: EncryptedBlob,
}

/// Everything needed to persist a new vault profile.
#[derive(Debug, Clone)]
pub struct InitializedVault {
    pub salt: [u8; SALT_LEN],
    pub wrapped_master_key: EncryptedBlob,
    pub key_pair: KeyPairMaterial,
}

/// Generate a fresh random master key.
pub fn generate_master_key() -> Result<MasterKey> {
    Ok(MasterKey::from_bytes(crypto::generate_random_key()?))
}

/// Seal the master key under the KEK.
pub fn wrap_master_key(master: &MasterKey, kek: &Kek) -> Result<EncryptedBlob> {
    crypto::encrypt(master.as_bytes(), kek.as_bytes())
}

/// Open a wrapped master key.
///
/// Fails with `DecryptionFailure` on a wrong KEK or tampered blob, and also
/// when the plaintext is not exactly one key long.
pub fn unwrap_master_key(wrapped: &EncryptedBlob, kek: &Kek) -> Result<MasterKey> {
    let plaintext = crypto::open(wrapped, kek.as_bytes())?;
    MasterKey::from_slice(&plaintext).ok_or(VaultError::DecryptionFailure)
}

/// Create a new vault: salt, KEK, master key and sharing key pair.
///
/// The session ends Unlocked holding the new master key and private key.
pub fn initialize(
    session: &mut Session,
    password: &str,
    params: &KdfParams,
) -> Result<InitializedVault> {
    let salt = kdf::generate_salt()?;
    let kek = kdf::derive_kek(password, &salt, params)?;

    let master = generate_master_key()?;
    let wrapped_master_key = wrap_master_key(&master, &kek)?;

    let SharingKeyPair { public, private } = asymmetric::generate_key_pair()?;
    let key_pair = KeyPairMaterial {
        public_key: asymmetric::export_public_key(&public)?,
        encrypted_private_key: asymmetric::export_private_key(&private, &kek)?,
    };

    session.install(master, Some(private));
    info!("vault initialized");

    Ok(InitializedVault {
        salt,
        wrapped_master_key,
        key_pair,
    })
}

/// Derive the KEK and open the master key. Any failure to open is reported
/// as `InvalidPassword`.
fn open_master_key(
    password: &str,
    salt: &[u8],
    wrapped: &EncryptedBlob,
    params: &KdfParams,
) -> Result<(Kek, MasterKey)> {
    let kek = kdf::derive_kek(password, salt, params)?;
    match unwrap_master_key(wrapped, &kek) {
        Ok(master) => Ok((kek, master)),
        Err(_) => {
            warn!("unlock rejected");
            Err(VaultError::InvalidPassword)
        }
    }
}

/// Unlock with the master key only. Received shares stay unavailable.
pub fn unlock(
    session: &mut Session,
    password: &str,
    salt: &[u8],
    wrapped_master_key: &EncryptedBlob,
    params: &KdfParams,
) -> Result<()> {
    let (_kek, master) = open_master_key(password, salt, wrapped_master_key, params)?;
    session.install(master, None);
    info!("vault unlocked");
    Ok(())
}

/// Unlock and, when present, import the sharing private key with the same KEK.
///
/// A private key that fails to import does not fail the unlock; the session
/// is opened without the ability to receive shares.
pub fn unlock_with_sharing_key(
    session: &mut Session,
    password: &str,
    salt: &[u8],
    wrapped_master_key: &EncryptedBlob,
    wrapped_private_key: Option<&EncryptedBlob>,
    params: &KdfParams,
) -> Result<()> {
    let (kek, master) = open_master_key(password, salt, wrapped_master_key, params)?;

    let private = match wrapped_private_key {
        Some(blob) => match asymmetric::import_private_key(blob, &kek) {
            Ok(private) => Some(private),
            Err(e) => {
                warn!(error = %e, "sharing key import failed, continuing without it");
                None
            }
        },
        None => None,
    };

    session.install(master, private);
    info!(sharing = session.can_receive_shares(), "vault unlocked");
    Ok(())
}

/// Return the session to Locked, discarding all resident secrets.
pub fn lock(session: &mut Session) {
    session.lock();
    info!("vault locked");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn fast() -> KdfParams {
        KdfParams::insecure_fast()
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let password = "correct-horse-battery";
        let salt = kdf::generate_salt().unwrap();
        let mk = generate_master_key().unwrap();

        let wrapped = wrap_master_key(&mk, &kdf::derive_kek(password, &salt, &fast()).unwrap())
            .unwrap();
        let unwrapped =
            unwrap_master_key(&wrapped, &kdf::derive_kek(password, &salt, &fast()).unwrap())
                .unwrap();
        assert_eq!(unwrapped.as_bytes(), mk.as_bytes());

        let mut session = Session::new();
        let err = unlock(&mut session, "wrong-password", &salt, &wrapped, &fast()).unwrap_err();
        assert!(matches!(err, VaultError::InvalidPassword));
        assert_eq!(session.state(), SessionState::Locked);
    }

    #[test]
    fn test_unwrap_rejects_wrong_length_plaintext() {
        let kek = Kek::from_bytes([1u8; 32]);
        let blob = crypto::encrypt(&[0u8; 16], kek.as_bytes()).unwrap();
        assert!(matches!(
            unwrap_master_key(&blob, &kek),
            Err(VaultError::DecryptionFailure)
        ));
    }

    #[test]
    fn test_initialize_then_unlock() {
        let mut session = Session::new();
        let init = initialize(&mut session, "pw-123456", &fast()).unwrap();
        assert!(session.is_unlocked());
        assert!(session.can_receive_shares());
        let original = *session.master_key().unwrap().as_bytes();

        lock(&mut session);
        assert_eq!(session.state(), SessionState::Locked);

        unlock_with_sharing_key(
            &mut session,
            "pw-123456",
            &init.salt,
            &init.wrapped_master_key,
            Some(&init.key_pair.encrypted_private_key),
            &fast(),
        )
        .unwrap();
        assert_eq!(session.master_key().unwrap().as_bytes(), &original);
        assert!(session.can_receive_shares());
    }

    #[test]
    fn test_corrupt_private_key_does_not_block_unlock() {
        let mut session = Session::new();
        let init = initialize(&mut session, "pw", &fast()).unwrap();
        session.lock();

        let mut bad = init.key_pair.encrypted_private_key.clone();
        bad.ciphertext[0] ^= 0xff;

        unlock_with_sharing_key(
            &mut session,
            "pw",
            &init.salt,
            &init.wrapped_master_key,
            Some(&bad),
            &fast(),
        )
        .unwrap();
        assert!(session.is_unlocked());
        assert!(matches!(
            session.private_key(),
            Err(VaultError::SharingKeyUnavailable)
        ));
    }
}
