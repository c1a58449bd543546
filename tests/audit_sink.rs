//! Tests for the pluggable AuditSink / forward sink functionality.

mod support;

use std::sync::{Arc, Mutex};

use zkvault::audit::{AuditSink, ShareRecord};
use zkvault::ItemFields;

use support::{alice, bob, enroll, fast_vault};

/// A test sink that collects records into a shared Vec.
struct SharedVecSink {
    records: Arc<Mutex<Vec<ShareRecord>>>,
}

impl AuditSink for SharedVecSink {
    fn append(&mut self, record: &ShareRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

#[test]
fn test_forward_sink_receives_share_records() {
    let mut vault = fast_vault();
    let records = Arc::new(Mutex::new(Vec::new()));
    vault.add_audit_sink(Box::new(SharedVecSink {
        records: Arc::clone(&records),
    }));

    let a = enroll(&mut vault, &alice(), "pw-a");
    enroll(&mut vault, &bob(), "pw-b");
    let id = vault
        .add_item(&alice(), &a, &ItemFields::new("n", "", "u", "p"))
        .unwrap();
    let shared = vault.share_item(&alice(), &a, &id, "bob@example.com").unwrap();

    // Primary log has the record
    assert_eq!(vault.audit_log().len(), 1);
    let logged = vault.audit_log().iter().next().unwrap();
    assert_eq!(logged.shared_item_id, shared.id);

    // Forward sink also received the record
    let collected = records.lock().unwrap();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].sender_id, "u-alice");
    assert_eq!(collected[0].recipient_id, "u-bob");
}

#[test]
fn test_failed_share_is_not_logged() {
    let mut vault = fast_vault();
    let a = enroll(&mut vault, &alice(), "pw-a");
    enroll(&mut vault, &bob(), "pw-b");

    assert!(vault
        .share_item(&alice(), &a, "no-such-item", "bob@example.com")
        .is_err());
    assert!(vault.audit_log().is_empty());
}
