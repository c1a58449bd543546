#![allow(dead_code)]

use zkvault::store::MemoryStore;
use zkvault::{Identity, KdfParams, Session, Vault, VaultConfig};

pub fn fast_vault() -> Vault<MemoryStore> {
    let config = VaultConfig {
        kdf: KdfParams::insecure_fast(),
        ..VaultConfig::default()
    };
    Vault::new(MemoryStore::new(), config).unwrap()
}

pub fn alice() -> Identity {
    Identity::new("u-alice", "alice@example.com")
}

pub fn bob() -> Identity {
    Identity::new("u-bob", "bob@example.com")
}

pub fn carol() -> Identity {
    Identity::new("u-carol", "carol@example.com")
}

/// Create a profile and hand back its unlocked session.
pub fn enroll(vault: &mut Vault<MemoryStore>, who: &Identity, password: &str) -> Session {
    vault.initialize(who, password).unwrap()
}
