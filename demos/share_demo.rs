//! Minimal example: two users sharing one credential.
//!
//! Creates two vaults over an in-memory store, stores a login for Alice,
//! shares it with Bob and reads it back from Bob's side. The share is also
//! written to a JSON-lines audit file.
//!
//! Run with: `cargo run --example share_demo`

use zkvault::audit::FileAuditSink;
use zkvault::store::MemoryStore;
use zkvault::{Identity, ItemFields, KdfParams, Vault, VaultConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup. The fast KDF profile keeps the demo quick; real vaults use the default.
    let config = VaultConfig {
        kdf: KdfParams::insecure_fast(),
        ..VaultConfig::default()
    };
    let mut vault = Vault::new(MemoryStore::new(), config)?;

    let audit_path = std::env::temp_dir().join("zkvault_shares.jsonl");
    vault.add_audit_sink(Box::new(FileAuditSink::new(&audit_path)?));

    let alice = Identity::new("u-alice", "alice@example.com");
    let bob = Identity::new("u-bob", "bob@example.com");

    // 2. Both users create their vaults.
    let alice_session = vault.initialize(&alice, "alice-master-password")?;
    let mut bob_session = vault.initialize(&bob, "bob-master-password")?;
    vault.lock(&mut bob_session);

    // 3. Alice stores a login and shares it.
    let item_id = vault.add_item(
        &alice,
        &alice_session,
        &ItemFields::new("Router", "192.168.0.1", "admin", "correct-horse-battery"),
    )?;
    let shared = vault.share_item(&alice, &alice_session, &item_id, "bob@example.com")?;
    println!("Alice shared item {} as {}", item_id, shared.id);

    // 4. Bob unlocks and reads it.
    let bob_session = vault.unlock(&bob, "bob-master-password")?;
    for received in vault.list_shared_items(&bob, &bob_session)? {
        let fields = received.fields?;
        println!(
            "Bob received '{}' for {} (user {})",
            fields.name, fields.url, fields.username
        );
    }

    // 5. Storage holds ciphertext only.
    let dump = vault.store().dump();
    assert!(!dump.contains("correct-horse-battery"));
    println!("Storage dump is {} bytes of ciphertext and metadata", dump.len());

    println!("Audit log written to {}", audit_path.display());
    Ok(())
}
