//! Vault item payloads.
//!
//! Items travel as JSON inside an AES-GCM envelope. This module is the last
//! mile on both sides of the cipher: serialize then seal under the master
//! key, or open then deserialize.

use std::fmt;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::crypto::{self, EncryptedBlob};
use crate::error::{Result, VaultError};
use crate::keys::MasterKey;
use crate::records::VaultItemRecord;

/// Below this many records a batch is opened on the calling thread.
const PARALLEL_THRESHOLD: usize = 32;

/// The structured content of one vault item (a login).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ItemFields {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for ItemFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemFields")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Canonical byte encoding of an item.
pub fn serialize(fields: &ItemFields) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(fields)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::Serialization(e.to_string()))
}

/// Parse decrypted bytes back into an item.
pub fn deserialize(bytes: &[u8]) -> Result<ItemFields> {
    serde_json::from_slice(bytes).map_err(|e| VaultError::Serialization(e.to_string()))
}

/// Serialize and encrypt an item under the master key.
pub fn seal_item(master: &MasterKey, fields: &ItemFields) -> Result<EncryptedBlob> {
    let plaintext = serialize(fields)?;
    crypto::encrypt(&plaintext, master.as_bytes())
}

/// Decrypt an item under the master key and parse it.
pub fn open_item(master: &MasterKey, record: &VaultItemRecord) -> Result<ItemFields> {
    let blob = record.blob()?;
    let plaintext = crypto::open(&blob, master.as_bytes())?;
    deserialize(&plaintext)
}

/// One slot of a batch decryption.
#[derive(Debug)]
pub struct OpenedItem {
    pub record: VaultItemRecord,
    /// The item, or the error marker for this record alone.
    pub fields: Result<ItemFields>,
}

impl OpenedItem {
    pub fn is_ok(&self) -> bool {
        self.fields.is_ok()
    }
}

/// Decrypt a batch of items.
///
/// Every record is opened independently; a corrupt or undecryptable record
/// yields an error in its own slot and never aborts the batch. Output order
/// matches input order. Large batches are spread over scoped worker threads.
pub fn open_items(master: &MasterKey, records: Vec<VaultItemRecord>) -> Vec<OpenedItem> {
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let results: Vec<Result<ItemFields>> = if records.len() < PARALLEL_THRESHOLD || workers < 2 {
        records.iter().map(|r| open_item(master, r)).collect()
    } else {
        let chunk = records.len().div_ceil(workers);
        thread::scope(|s| {
            let handles: Vec<_> = records
                .chunks(chunk)
                .map(|part| {
                    s.spawn(move || {
                        part.iter()
                            .map(|r| open_item(master, r))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|p| std::panic::resume_unwind(p)))
                .collect()
        })
    };

    records
        .into_iter()
        .zip(results)
        .map(|(record, fields)| {
            if let Err(e) = &fields {
                warn!(item_id = %record.id, error = %e, "item failed to decrypt");
            }
            OpenedItem { record, fields }
        })
        .collect()
}
