mod support;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zkvault::store::VaultStore;
use zkvault::{ItemFields, VaultError};

use support::{alice, bob, carol, enroll, fast_vault};

#[test]
fn test_share_reaches_recipient() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    let mut b = enroll(&mut vault, &bob(), "pw-b");

    let fields = ItemFields::new("wifi", "router.local", "admin", "correct-horse");
    let id = vault.add_item(&alice(), &a, &fields).unwrap();

    // 1. Share.
    let shared = vault
        .share_item(&alice(), &a, &id, "bob@example.com")
        .unwrap();
    assert_eq!(shared.sender_id, "u-alice");
    assert_eq!(shared.recipient_id, "u-bob");

    // 2. Bob re-opens his vault from scratch and reads the share.
    vault.lock(&mut b);
    let b = vault.unlock(&bob(), "pw-b").unwrap();
    let received = vault.list_shared_items(&bob(), &b).unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].fields.as_ref().unwrap(), &fields);

    // 3. Alice has no incoming shares.
    assert!(vault.list_shared_items(&alice(), &a).unwrap().is_empty());
}

#[test]
fn test_each_share_uses_independent_key() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    enroll(&mut vault, &bob(), "pw-b");

    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();
    let first = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();
    let second = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();

    assert_ne!(first.encrypted_key, second.encrypted_key);
    assert_ne!(first.encrypted_data, second.encrypted_data);
    assert_ne!(first.nonce, second.nonce);
}

#[test]
fn test_unknown_recipient() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();

    let err = vault
        .share_item(&alice(), &a, &id, "nobody@example.com")
        .unwrap_err();
    assert!(matches!(err, VaultError::RecipientNotFound(ref e) if e == "nobody@example.com"));
    assert!(vault.audit_log().is_empty());
}

#[test]
fn test_recipient_without_public_key() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    enroll(&mut vault, &bob(), "pw-b");

    // A legacy profile that never enabled sharing.
    let mut legacy = vault.store().profile_by_id("u-bob").unwrap().unwrap();
    legacy.id = "u-carol".into();
    legacy.email = "carol@example.com".into();
    legacy.public_key = None;
    legacy.encrypted_private_key = None;
    legacy.pk_nonce = None;
    vault.store_mut().insert_profile(legacy).unwrap();

    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();
    assert!(matches!(
        vault.share_item(&alice(), &a, &id, "carol@example.com"),
        Err(VaultError::RecipientNotFound(_))
    ));
}

#[test]
fn test_shared_item_deletion_by_either_party() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    let b = enroll(&mut vault, &bob(), "pw-b");
    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();

    let first = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();
    let second = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();

    vault.delete_shared_item(&bob(), &b, &first.id).unwrap();
    vault.delete_shared_item(&alice(), &a, &second.id).unwrap();
    assert!(vault.list_shared_items(&bob(), &b).unwrap().is_empty());

    assert!(matches!(
        vault.delete_shared_item(&bob(), &b, &first.id),
        Err(VaultError::ItemNotFound(_))
    ));

    // Deleting the original does not depend on the share, and vice versa.
    vault.delete_item(&alice(), &a, &id).unwrap();
}

#[test]
fn test_tampered_share_is_isolated_in_listing() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    let b = enroll(&mut vault, &bob(), "pw-b");

    let good_id = vault
        .add_item(&alice(), &a, &ItemFields::new("good", "", "u", "p1"))
        .unwrap();
    let bad_id = vault
        .add_item(&alice(), &a, &ItemFields::new("bad", "", "u", "p2"))
        .unwrap();
    let good = vault.share_item(&alice(), &a, &good_id, "bob@example.com").unwrap();
    let bad = vault.share_item(&alice(), &a, &bad_id, "bob@example.com").unwrap();

    // Flip one byte of the wrapped one-time key.
    let record = vault.store_mut().shared_item_mut(&bad.id).unwrap();
    let mut wrapped = STANDARD.decode(&record.encrypted_key).unwrap();
    wrapped[10] ^= 0x01;
    record.encrypted_key = STANDARD.encode(wrapped);

    let received = vault.list_shared_items(&bob(), &b).unwrap();
    assert_eq!(received.len(), 2);
    let ok = received.iter().find(|r| r.record.id == good.id).unwrap();
    let failed = received.iter().find(|r| r.record.id == bad.id).unwrap();
    assert_eq!(ok.fields.as_ref().unwrap().name, "good");
    assert!(matches!(failed.fields, Err(VaultError::DecryptionFailure)));
}

#[test]
fn test_third_party_cannot_delete_share() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    let b = enroll(&mut vault, &bob(), "pw-b");
    let c = enroll(&mut vault, &carol(), "pw-c");

    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();
    let shared = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();

    assert!(matches!(
        vault.delete_shared_item(&carol(), &c, &shared.id),
        Err(VaultError::ItemNotFound(_))
    ));
    assert_eq!(vault.list_shared_items(&bob(), &b).unwrap().len(), 1);
}
