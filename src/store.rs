//! Storage collaborator contract.
//!
//! The vault engine persists only the record shapes in [`crate::records`].
//! Implementations may be remote; their errors are opaque to the engine and
//! are passed through unchanged. Retrying transient storage failures is the
//! caller's decision.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::records::{ProfileRecord, SharedItemRecord, VaultItemRecord};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Insert, select-by-id, select-by-field and delete over vault records.
///
/// Profile ids and profile emails are both unique. `profile_by_email` must
/// never pick one of several matches; an implementation that can hold
/// duplicates reports them as an error.
pub trait VaultStore {
    /// Fails if the id or the email is already registered.
    fn insert_profile(&mut self, profile: ProfileRecord) -> StoreResult<()>;
    fn profile_by_id(&self, id: &str) -> StoreResult<Option<ProfileRecord>>;
    fn profile_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>>;

    fn insert_item(&mut self, item: VaultItemRecord) -> StoreResult<()>;
    fn item_by_id(&self, id: &str) -> StoreResult<Option<VaultItemRecord>>;
    fn items_by_owner(&self, owner_id: &str) -> StoreResult<Vec<VaultItemRecord>>;
    /// Returns whether a record was removed.
    fn delete_item(&mut self, id: &str) -> StoreResult<bool>;

    fn insert_shared_item(&mut self, item: SharedItemRecord) -> StoreResult<()>;
    fn shared_item_by_id(&self, id: &str) -> StoreResult<Option<SharedItemRecord>>;
    fn shared_items_by_recipient(&self, recipient_id: &str) -> StoreResult<Vec<SharedItemRecord>>;
    /// Returns whether a record was removed.
    fn delete_shared_item(&mut self, id: &str) -> StoreResult<bool>;
}

/// Process-local store. Useful for tests and single-process embedding.
///
/// Listings come back in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: HashMap<String, ProfileRecord>,
    items: Vec<VaultItemRecord>,
    shared: Vec<SharedItemRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to a stored item, for simulating storage-side tampering.
    pub fn item_mut(&mut self, id: &str) -> Option<&mut VaultItemRecord> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Mutable access to a stored shared item.
    pub fn shared_item_mut(&mut self, id: &str) -> Option<&mut SharedItemRecord> {
        self.shared.iter_mut().find(|s| s.id == id)
    }

    /// Every record the store holds, serialized. What a storage operator sees.
    pub fn dump(&self) -> String {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        serde_json::json!({
            "profiles": profiles,
            "vault_items": self.items,
            "shared_items": self.shared,
        })
        .to_string()
    }
}

impl VaultStore for MemoryStore {
    fn insert_profile(&mut self, profile: ProfileRecord) -> StoreResult<()> {
        if self.profiles.contains_key(&profile.id) {
            return Err(format!("duplicate profile id {}", profile.id).into());
        }
        if self.profiles.values().any(|p| p.email == profile.email) {
            return Err(format!("duplicate profile email {}", profile.email).into());
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn profile_by_id(&self, id: &str) -> StoreResult<Option<ProfileRecord>> {
        Ok(self.profiles.get(id).cloned())
    }

    fn profile_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>> {
        let mut matches = self.profiles.values().filter(|p| p.email == email);
        let found = matches.next().cloned();
        if matches.next().is_some() {
            return Err(format!("ambiguous profile email {email}").into());
        }
        Ok(found)
    }

    fn insert_item(&mut self, item: VaultItemRecord) -> StoreResult<()> {
        self.items.push(item);
        Ok(())
    }

    fn item_by_id(&self, id: &str) -> StoreResult<Option<VaultItemRecord>> {
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    fn items_by_owner(&self, owner_id: &str) -> StoreResult<Vec<VaultItemRecord>> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn delete_item(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        Ok(self.items.len() != before)
    }

    fn insert_shared_item(&mut self, item: SharedItemRecord) -> StoreResult<()> {
        self.shared.push(item);
        Ok(())
    }

    fn shared_item_by_id(&self, id: &str) -> StoreResult<Option<SharedItemRecord>> {
        Ok(self.shared.iter().find(|s| s.id == id).cloned())
    }

    fn shared_items_by_recipient(&self, recipient_id: &str) -> StoreResult<Vec<SharedItemRecord>> {
        Ok(self
            .shared
            .iter()
            .filter(|s| s.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    fn delete_shared_item(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.shared.len();
        self.shared.retain(|s| s.id != id);
        Ok(self.shared.len() != before)
    }
}
