//! Credential records and their bounded store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::bounded::{DataTable, IndexTable, TableBackend};
use crate::error::Result;
use crate::time_utils::now_ms;

pub(crate) const CREDENTIAL_DATA: DataTable = redb::TableDefinition::new("credentials:data");
pub(crate) const CREDENTIAL_INDEX: IndexTable = redb::TableDefinition::new("credentials:index");

/// Coarse password strength tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

/// A fabricated throwaway identity. Immutable once created; the store only
/// inserts and evicts, never mutates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CredentialRecord {
    pub id: String,
    pub email: String,
    pub password: String,
    pub strength: Strength,
    /// Creation time, epoch millis.
    #[ts(type = "number")]
    pub timestamp: i64,
}

impl CredentialRecord {
    pub fn new(email: String, password: String, strength: Strength) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password,
            strength,
            timestamp: now_ms(),
        }
    }
}

/// Bounded credential store. Capacity-bounded at construction; oldest
/// records by timestamp are evicted first.
pub struct CredentialStore {
    inner: TableBackend,
}

impl CredentialStore {
    pub(crate) fn new(inner: TableBackend) -> Self {
        Self { inner }
    }

    /// Upsert by id; trimming happens in the same write, so the next read
    /// observes at most the capacity's worth of records.
    pub fn put(&self, record: &CredentialRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.inner.put(&record.id, record.timestamp, &bytes)
    }

    /// All stored credentials, newest first.
    pub fn load_all(&self) -> Result<Vec<CredentialRecord>> {
        let mut records = Vec::new();
        for bytes in self.inner.load_all()? {
            records.push(serde_json::from_slice(&bytes)?);
        }
        Ok(records)
    }

    pub fn get(&self, id: &str) -> Result<Option<CredentialRecord>> {
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

    #[test]
    fn roundtrip_preserves_fields() {
        let storage = Storage::in_memory();

        let record = CredentialRecord::new(
            "echo7k2p@trashmail.dev".to_string(),
            "aB3$efGh1jK!".to_string(),
            Strength::Medium,
        );
        storage.credentials.put(&record).unwrap();

        let loaded = storage.credentials.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.email, record.email);
        assert_eq!(loaded.password, record.password);
        assert_eq!(loaded.strength, Strength::Medium);
        assert_eq!(loaded.timestamp, record.timestamp);
    }

    #[test]
    fn newest_record_loads_first() {
        let storage = Storage::in_memory();

        let mut older = CredentialRecord::new(
            "older@burnbox.io".to_string(),
            "pw".to_string(),
            Strength::Weak,
        );
        older.timestamp = 1_000;
        let mut newer = older.clone();
        newer.id = "newer".to_string();
        newer.email = "newer@burnbox.io".to_string();
        newer.timestamp = 2_000;

        storage.credentials.put(&older).unwrap();
        storage.credentials.put(&newer).unwrap();

        let records = storage.credentials.load_all().unwrap();
        assert_eq!(records[0].email, "newer@burnbox.io");
        assert_eq!(records[1].email, "older@burnbox.io");
    }
}
