//! Synthetic inbox messages and their bounded store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::bounded::{DataTable, IndexTable, TableBackend};
use crate::error::Result;
use crate::time_utils::now_ms;

pub(crate) const MESSAGE_DATA: DataTable = redb::TableDefinition::new("messages:data");
pub(crate) const MESSAGE_INDEX: IndexTable = redb::TableDefinition::new("messages:index");

/// One synthetic inbox message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageRecord {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
    /// One-time code carried by the body, when one was embedded.
    pub otp: Option<String>,
    /// Delivery time, epoch millis.
    #[ts(type = "number")]
    pub timestamp: i64,
}

impl MessageRecord {
    pub fn new(sender: String, subject: String, body: String, otp: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            subject,
            body,
            otp,
            timestamp: now_ms(),
        }
    }
}

/// Bounded message store; same contract as the credential store.
pub struct MessageStore {
    inner: TableBackend,
}

impl MessageStore {
    pub(crate) fn new(inner: TableBackend) -> Self {
        Self { inner }
    }

    pub fn put(&self, record: &MessageRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.inner.put(&record.id, record.timestamp, &bytes)
    }

    /// All stored messages, newest first.
    pub fn load_all(&self) -> Result<Vec<MessageRecord>> {
        let mut records = Vec::new();
        for bytes in self.inner.load_all()? {
            records.push(serde_json::from_slice(&bytes)?);
        }
        Ok(records)
    }

    pub fn get(&self, id: &str) -> Result<Option<MessageRecord>> {
        match self.inner.get(id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete by id, returns true if the record existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.inner.delete(id)
    }

    pub fn count(&self) -> Result<usize> {
        self.inner.count()
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;
    use tempfile::tempdir;

    fn message_at(id: &str, timestamp: i64) -> MessageRecord {
        let mut record = MessageRecord::new(
            "CloudVault Security".to_string(),
            "Your verification code".to_string(),
            "Your code is 482913.".to_string(),
            Some("482913".to_string()),
        );
        record.id = id.to_string();
        record.timestamp = timestamp;
        record
    }

    #[test]
    fn put_then_load_has_record_at_head() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("inbox.redb"));
        assert!(storage.is_persistent());

        storage.messages.put(&message_at("old", 1_000)).unwrap();
        let newest = message_at("new", 5_000);
        storage.messages.put(&newest).unwrap();

        let records = storage.messages.load_all().unwrap();
        assert_eq!(records[0].id, "new");
        assert_eq!(records[0].otp.as_deref(), Some("482913"));
    }

    #[test]
    fn capacity_law_on_persistent_store() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("inbox.redb"));

        for i in 0..150i64 {
            storage.messages.put(&message_at(&format!("msg-{i}"), 1_000 + i)).unwrap();
        }

        let records = storage.messages.load_all().unwrap();
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].id, "msg-149");
        assert_eq!(records[99].id, "msg-50");
        assert!(storage.messages.get("msg-49").unwrap().is_none());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inbox.redb");

        {
            let storage = Storage::open(&path);
            storage.messages.put(&message_at("keep", 1_000)).unwrap();
        }

        let storage = Storage::open(&path);
        assert_eq!(storage.messages.count().unwrap(), 1);
        assert_eq!(storage.messages.get("keep").unwrap().unwrap().id, "keep");
    }
}
