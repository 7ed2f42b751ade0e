//! In-process fallback tables.
//!
//! Selected at construction when no durable backing can be opened. The
//! contract matches the redb variant exactly; only the durability property
//! differs, and records live for the process lifetime only.

use parking_lot::RwLock;

use crate::bounded::index_key;
use crate::error::Result;

struct MemoryEntry {
    /// Same reverse-timestamp key as the redb index; entries stay sorted by
    /// it, so position 0 is the newest record.
    key: String,
    id: String,
    bytes: Vec<u8>,
}

pub(crate) struct MemoryTable {
    capacity: usize,
    entries: RwLock<Vec<MemoryEntry>>,
}

impl MemoryTable {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn put(&self, id: &str, timestamp_ms: i64, bytes: &[u8]) -> Result<()> {
        let key = index_key(timestamp_ms, id);
        let mut entries = self.entries.write();

        entries.retain(|entry| entry.id != id);
        let position = entries.partition_point(|entry| entry.key < key);
        entries.insert(
            position,
            MemoryEntry {
                key,
                id: id.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        // Excess entries sit at the tail, which is oldest-by-timestamp.
        entries.truncate(self.capacity);
        Ok(())
    }

    pub(crate) fn load_all(&self) -> Result<Vec<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries.iter().map(|entry| entry.bytes.clone()).collect())
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.bytes.clone()))
    }

    pub(crate) fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        Ok(entries.len() < before)
    }

    pub(crate) fn count(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}
