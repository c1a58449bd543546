//! The vault facade.
//!
//! `Vault` wires the key services to a storage collaborator and exposes the
//! operations a client surface needs. It holds no secrets itself: every call
//! that touches item content takes the caller's [`Session`], and the caller's
//! [`Identity`] comes from an external authentication layer.
//!
//! Key derivation and RSA key generation block for a noticeable time.
//! Interactive callers should run `initialize` and `unlock` on a worker
//! thread.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use tracing::{info, warn};

use crate::asymmetric;
use crate::audit::{AuditLog, AuditSink, ShareRecord};
use crate::codec::{self, ItemFields, OpenedItem};
use crate::config::VaultConfig;
use crate::crypto;
use crate::error::{Result, VaultError};
use crate::health::{self, SecurityReport};
use crate::master;
use crate::records::{ProfileRecord, SharedItemRecord, VaultItemRecord};
use crate::session::Session;
use crate::sharing;
use crate::store::VaultStore;

/// An authenticated user, as supplied by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

/// One slot of a received-shares listing.
#[derive(Debug)]
pub struct ReceivedItem {
    pub record: SharedItemRecord,
    /// The item, or the error marker for this record alone.
    pub fields: Result<ItemFields>,
}

/// Vault engine bound to one storage collaborator.
///
/// Owns the store, the configuration and the sharing audit log. All key
/// material stays in the caller's [`Session`].
pub struct Vault<S: VaultStore> {
    store: S,
    config: VaultConfig,
    audit: AuditLog,
}

impl<S: VaultStore> Vault<S> {
    /// Create a vault over `store`. Fails if the configuration is unusable.
    pub fn new(store: S, config: VaultConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            audit: AuditLog::new(),
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Return a reference to the sharing audit log.
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Add a sink that receives a copy of every share record.
    pub fn add_audit_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.audit.add_forward_sink(sink);
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Create the caller's vault profile and return an unlocked session.
    pub fn initialize(&mut self, identity: &Identity, password: &str) -> Result<Session> {
        if self
            .store
            .profile_by_id(&identity.user_id)
            .map_err(VaultError::Storage)?
            .is_some()
        {
            return Err(VaultError::AlreadyInitialized);
        }
        if self
            .store
            .profile_by_email(&identity.email)
            .map_err(VaultError::Storage)?
            .is_some()
        {
            return Err(VaultError::EmailInUse(identity.email.clone()));
        }

        let mut session = Session::new();
        let init = master::initialize(&mut session, password, &self.config.kdf)?;

        let (encrypted_mk, mk_nonce) = init.wrapped_master_key.to_base64_parts();
        let (encrypted_private_key, pk_nonce) =
            init.key_pair.encrypted_private_key.to_base64_parts();
        let profile = ProfileRecord {
            id: identity.user_id.clone(),
            email: identity.email.clone(),
            salt_kek: STANDARD.encode(init.salt),
            encrypted_mk,
            mk_nonce,
            public_key: Some(init.key_pair.public_key),
            encrypted_private_key: Some(encrypted_private_key),
            pk_nonce: Some(pk_nonce),
            created_at: Utc::now(),
        };
        self.store
            .insert_profile(profile)
            .map_err(VaultError::Storage)?;

        info!(user_id = %identity.user_id, "vault profile created");
        Ok(session)
    }

    /// Open the caller's vault. A wrong password yields `InvalidPassword`.
    pub fn unlock(&self, identity: &Identity, password: &str) -> Result<Session> {
        let profile = self.profile(identity)?;
        let salt = crypto::decode_b64(&profile.salt_kek)?;
        let wrapped_mk = profile.wrapped_master_key()?;
        let wrapped_pk = profile.wrapped_private_key()?;

        let mut session = Session::new();
        master::unlock_with_sharing_key(
            &mut session,
            password,
            &salt,
            &wrapped_mk,
            wrapped_pk.as_ref(),
            &self.config.kdf,
        )?;
        Ok(session)
    }

    /// Lock a session, discarding its keys.
    pub fn lock(&self, session: &mut Session) {
        master::lock(session);
    }

    fn profile(&self, identity: &Identity) -> Result<ProfileRecord> {
        self.store
            .profile_by_id(&identity.user_id)
            .map_err(VaultError::Storage)?
            .ok_or(VaultError::ProfileNotFound)
    }

    // -----------------------------------------------------------------------
    // Personal items
    // -----------------------------------------------------------------------

    /// Encrypt and store a new item. Returns its id.
    pub fn add_item(
        &mut self,
        identity: &Identity,
        session: &Session,
        fields: &ItemFields,
    ) -> Result<String> {
        let master = session.master_key()?;
        let blob = codec::seal_item(master, fields)?;
        let record = VaultItemRecord::from_sealed(&identity.user_id, &blob);
        let id = record.id.clone();
        self.store.insert_item(record).map_err(VaultError::Storage)?;
        info!(item_id = %id, "item added");
        Ok(id)
    }

    /// Decrypt every item the caller owns. Failures are reported per item.
    pub fn list_items(&self, identity: &Identity, session: &Session) -> Result<Vec<OpenedItem>> {
        let master = session.master_key()?;
        let records = self
            .store
            .items_by_owner(&identity.user_id)
            .map_err(VaultError::Storage)?;
        Ok(codec::open_items(master, records))
    }

    /// Delete one of the caller's items.
    pub fn delete_item(
        &mut self,
        identity: &Identity,
        session: &Session,
        item_id: &str,
    ) -> Result<()> {
        session.master_key()?;
        self.owned_item(identity, item_id)?;
        self.store.delete_item(item_id).map_err(VaultError::Storage)?;
        info!(item_id, "item deleted");
        Ok(())
    }

    fn owned_item(&self, identity: &Identity, item_id: &str) -> Result<VaultItemRecord> {
        self.store
            .item_by_id(item_id)
            .map_err(VaultError::Storage)?
            .filter(|item| item.owner_id == identity.user_id)
            .ok_or_else(|| VaultError::ItemNotFound(item_id.to_string()))
    }

    /// Password hygiene over the caller's items.
    pub fn security_report(&self, identity: &Identity, session: &Session) -> Result<SecurityReport> {
        let items = self.list_items(identity, session)?;
        Ok(health::security_report(&items, self.config.weak_password_len))
    }

    // -----------------------------------------------------------------------
    // Sharing
    // -----------------------------------------------------------------------

    /// Share one of the caller's items with the user registered as
    /// `recipient_email`. The stored record is returned.
    pub fn share_item(
        &mut self,
        identity: &Identity,
        session: &Session,
        item_id: &str,
        recipient_email: &str,
    ) -> Result<SharedItemRecord> {
        let master = session.master_key()?;

        let recipient = self
            .store
            .profile_by_email(recipient_email)
            .map_err(VaultError::Storage)?
            .ok_or_else(|| VaultError::RecipientNotFound(recipient_email.to_string()))?;
        let public_key = recipient
            .public_key
            .as_deref()
            .ok_or_else(|| VaultError::RecipientNotFound(recipient_email.to_string()))?;
        let public_key = asymmetric::import_public_key(public_key)?;

        let item = self.owned_item(identity, item_id)?;
        let shared = sharing::share(
            master,
            &item,
            &identity.user_id,
            &recipient.id,
            &public_key,
        )?;

        self.store
            .insert_shared_item(shared.clone())
            .map_err(VaultError::Storage)?;
        self.audit.append(ShareRecord::for_shared_item(&shared));
        info!(
            shared_item_id = %shared.id,
            recipient_id = %shared.recipient_id,
            "item shared"
        );
        Ok(shared)
    }

    /// Open every item shared with the caller. Failures are reported per item.
    pub fn list_shared_items(
        &self,
        identity: &Identity,
        session: &Session,
    ) -> Result<Vec<ReceivedItem>> {
        let private_key = session.private_key()?;
        let records = self
            .store
            .shared_items_by_recipient(&identity.user_id)
            .map_err(VaultError::Storage)?;

        Ok(records
            .into_iter()
            .map(|record| {
                let fields = sharing::receive(private_key, &record);
                if let Err(e) = &fields {
                    warn!(shared_item_id = %record.id, error = %e, "shared item failed to decrypt");
                }
                ReceivedItem { record, fields }
            })
            .collect())
    }

    /// Delete a shared item. Either the sender or the recipient may do so.
    pub fn delete_shared_item(
        &mut self,
        identity: &Identity,
        session: &Session,
        shared_item_id: &str,
    ) -> Result<()> {
        session.master_key()?;
        let visible = self
            .store
            .shared_item_by_id(shared_item_id)
            .map_err(VaultError::Storage)?
            .is_some_and(|s| s.sender_id == identity.user_id || s.recipient_id == identity.user_id);
        if !visible {
            return Err(VaultError::ItemNotFound(shared_item_id.to_string()));
        }
        self.store
            .delete_shared_item(shared_item_id)
            .map_err(VaultError::Storage)?;
        info!(shared_item_id, "shared item deleted");
        Ok(())
    }
}
