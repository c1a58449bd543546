//! Append-only sharing audit log.
//!
//! Records every item that leaves a vault through sharing. Entries carry
//! only identifiers and a timestamp, never key material or item content.
//! Pluggable sinks forward records to files or other stores.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::records::SharedItemRecord;

/// A sink that receives audit records. Implement this to forward records
/// to a file, database or other persistent store.
pub trait AuditSink: Send {
    /// Append a record. Called once for every completed share.
    fn append(&mut self, record: &ShareRecord);
}

/// A permanent record of one share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub shared_item_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ShareRecord {
    pub fn for_shared_item(shared: &SharedItemRecord) -> Self {
        Self {
            shared_item_id: shared.id.clone(),
            sender_id: shared.sender_id.clone(),
            recipient_id: shared.recipient_id.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// In-memory log of shares made through one [`crate::Vault`].
#[derive(Default)]
pub struct AuditLog {
    records: Vec<ShareRecord>,
    forward_sinks: Vec<Box<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("records", &self.records)
            .field("forward_sinks", &self.forward_sinks.len())
            .finish()
    }
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to receive a copy of every record.
    pub fn add_forward_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.forward_sinks.push(sink);
    }

    /// Append a record and forward it to every attached sink.
    pub fn append(&mut self, record: ShareRecord) {
        for sink in self.forward_sinks.iter_mut() {
            sink.append(&record);
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShareRecord> {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Built-in sink: file
// ---------------------------------------------------------------------------

/// Writes records as JSON lines to a file, appending if it exists.
pub struct FileAuditSink {
    file: std::fs::File,
}

impl FileAuditSink {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl AuditSink for FileAuditSink {
    fn append(&mut self, record: &ShareRecord) {
        let written = serde_json::to_string(record)
            .map_err(std::io::Error::from)
            .and_then(|line| {
                writeln!(self.file, "{line}")?;
                self.file.flush()
            });
        if let Err(e) = written {
            warn!(error = %e, "audit sink write failed");
        }
    }
}
