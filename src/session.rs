//! Caller-owned unlock state.
//!
//! A `Session` holds the only long-lived secrets: the master key and the
//! decrypted sharing private key. It starts Locked. `lock` (or dropping the
//! session) zeroises both immediately. Sessions are plain values; there is
//! no process-wide current session.

use std::fmt;

use rsa::RsaPrivateKey;
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::keys::MasterKey;

/// Whether a master key is resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// One user's unlock state.
///
/// Created Locked by [`Session::new`] and filled by the master key services.
/// Every item operation borrows the master key through
/// [`Session::master_key`], which fails with `VaultLocked` when the session
/// holds none. The session is `Send`, so a slow unlock can run on a worker
/// thread and hand the result back.
#[derive(Default)]
pub struct Session {
    master_key: Option<MasterKey>,
    private_key: Option<RsaPrivateKey>,
}

impl Session {
    /// A fresh, locked session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.master_key.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == SessionState::Unlocked
    }

    /// Whether received shares can be opened in this session.
    pub fn can_receive_shares(&self) -> bool {
        self.private_key.is_some()
    }

    /// Borrow the master key, or fail with `VaultLocked`.
    pub fn master_key(&self) -> Result<&MasterKey> {
        self.master_key.as_ref().ok_or(VaultError::VaultLocked)
    }

    /// Borrow the sharing private key.
    ///
    /// Fails with `VaultLocked` when no master key is resident, and with
    /// `SharingKeyUnavailable` when the vault is open but the profile has no
    /// usable private key.
    pub fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.master_key()?;
        self.private_key
            .as_ref()
            .ok_or(VaultError::SharingKeyUnavailable)
    }

    pub(crate) fn install(&mut self, master_key: MasterKey, private_key: Option<RsaPrivateKey>) {
        self.master_key = Some(master_key);
        self.private_key = private_key;
    }

    /// Drop both secrets. Their memory is zeroised as they are dropped.
    pub fn lock(&mut self) {
        if self.master_key.take().is_some() {
            debug!("session locked");
        }
        self.private_key = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("can_receive_shares", &self.can_receive_shares())
            .finish()
    }
}
