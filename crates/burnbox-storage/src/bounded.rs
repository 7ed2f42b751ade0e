//! Bounded record tables.
//!
//! Each logical store keeps two redb tables: a data table keyed by record id
//! holding serialized bytes, and an index table whose keys embed the reverse
//! timestamp so an ascending range scan walks records newest-first. Every
//! write that inserts also trims past the capacity inside the same
//! transaction, so a subsequent read always observes the post-trim state.

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, Table, TableDefinition};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::memory::MemoryTable;

pub(crate) type DataTable = TableDefinition<'static, &'static str, &'static [u8]>;
pub(crate) type IndexTable = TableDefinition<'static, &'static str, &'static str>;

/// Index key for descending-timestamp scans. Ascending lexicographic order
/// over these keys is descending timestamp order; ties on the same
/// millisecond break by id, which is stable within one scan.
pub(crate) fn index_key(timestamp_ms: i64, id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{reverse_ts:020}:{id}")
}

/// Store capability, selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Records survive restart in the redb database.
    Persistent,
    /// Process-lifetime records only; no durable backing was available.
    Memory,
}

/// Byte-level bounded table over redb.
pub(crate) struct RedbTable {
    db: Arc<Database>,
    data: DataTable,
    index: IndexTable,
    capacity: usize,
}

impl RedbTable {
    pub(crate) fn new(
        db: Arc<Database>,
        data: DataTable,
        index: IndexTable,
        capacity: usize,
    ) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(data)?;
        write_txn.open_table(index)?;
        write_txn.commit()?;
        Ok(Self {
            db,
            data,
            index,
            capacity,
        })
    }

    /// Upsert by id, then trim, in one write transaction.
    pub(crate) fn put(&self, id: &str, timestamp_ms: i64, bytes: &[u8]) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut data = txn.open_table(self.data)?;
            let mut index = txn.open_table(self.index)?;

            if data.insert(id, bytes)?.is_some() {
                // Re-put of a known id: its previous index entry would
                // otherwise linger and resurface a stale timestamp.
                remove_index_entries(&mut index, id)?;
            }
            index.insert(index_key(timestamp_ms, id).as_str(), id)?;

            trim(&mut data, &mut index, self.capacity)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// All stored records, newest first. An empty store yields an empty vec.
    pub(crate) fn load_all(&self) -> Result<Vec<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(self.index)?;
        let data = read_txn.open_table(self.data)?;

        let mut records = Vec::new();
        for entry in index.iter()? {
            let (_, id) = entry?;
            if let Some(bytes) = data.get(id.value())? {
                records.push(bytes.value().to_vec());
            }
        }
        Ok(records)
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(self.data)?;

        if let Some(value) = table.get(id)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// Delete by id, returns true if the record existed.
    pub(crate) fn delete(&self, id: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut data = txn.open_table(self.data)?;
            let mut index = txn.open_table(self.index)?;

            let existed = data.remove(id)?.is_some();
            if existed {
                remove_index_entries(&mut index, id)?;
            }
            existed
        };
        txn.commit()?;
        Ok(existed)
    }

    pub(crate) fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(self.data)?;
        Ok(table.len()? as usize)
    }

    pub(crate) fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut data = txn.open_table(self.data)?;
            let mut index = txn.open_table(self.index)?;

            let mut ids = Vec::new();
            for entry in data.iter()? {
                let (key, _) = entry?;
                ids.push(key.value().to_string());
            }
            for id in &ids {
                data.remove(id.as_str())?;
            }

            let mut keys = Vec::new();
            for entry in index.iter()? {
                let (key, _) = entry?;
                keys.push(key.value().to_string());
            }
            for key in &keys {
                index.remove(key.as_str())?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

/// Delete all records whose rank by descending timestamp exceeds the
/// capacity, keeping exactly the most recent `capacity` entries.
fn trim(
    data: &mut Table<'_, &'static str, &'static [u8]>,
    index: &mut Table<'_, &'static str, &'static str>,
    capacity: usize,
) -> Result<()> {
    let excess: Vec<(String, String)> = {
        let mut seen = 0usize;
        let mut excess = Vec::new();
        for entry in index.iter()? {
            let (key, id) = entry?;
            seen += 1;
            if seen > capacity {
                excess.push((key.value().to_string(), id.value().to_string()));
            }
        }
        excess
    };

    for (key, id) in &excess {
        index.remove(key.as_str())?;
        data.remove(id.as_str())?;
    }
    if !excess.is_empty() {
        debug!(evicted = excess.len(), "Evicted oldest records past capacity");
    }
    Ok(())
}

/// Remove every index entry pointing at `id`.
fn remove_index_entries(
    index: &mut Table<'_, &'static str, &'static str>,
    id: &str,
) -> Result<()> {
    let stale: Vec<String> = {
        let mut keys = Vec::new();
        for entry in index.iter()? {
            let (key, value) = entry?;
            if value.value() == id {
                keys.push(key.value().to_string());
            }
        }
        keys
    };

    for key in &stale {
        index.remove(key.as_str())?;
    }
    Ok(())
}

/// Backend-dispatching bounded table. Both variants satisfy the same
/// put/trim/load contract; only durability differs.
pub(crate) enum TableBackend {
    Redb(RedbTable),
    Memory(MemoryTable),
}

impl TableBackend {
    pub(crate) fn put(&self, id: &str, timestamp_ms: i64, bytes: &[u8]) -> Result<()> {
        match self {
            Self::Redb(table) => table.put(id, timestamp_ms, bytes),
            Self::Memory(table) => table.put(id, timestamp_ms, bytes),
        }
    }

    pub(crate) fn load_all(&self) -> Result<Vec<Vec<u8>>> {
        match self {
            Self::Redb(table) => table.load_all(),
            Self::Memory(table) => table.load_all(),
        }
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Redb(table) => table.get(id),
            Self::Memory(table) => table.get(id),
        }
    }

    pub(crate) fn delete(&self, id: &str) -> Result<bool> {
        match self {
            Self::Redb(table) => table.delete(id),
            Self::Memory(table) => table.delete(id),
        }
    }

    pub(crate) fn count(&self) -> Result<usize> {
        match self {
            Self::Redb(table) => table.count(),
            Self::Memory(table) => table.count(),
        }
    }

    pub(crate) fn clear(&self) -> Result<()> {
        match self {
            Self::Redb(table) => table.clear(),
            Self::Memory(table) => table.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TEST_DATA: DataTable = TableDefinition::new("test:data");
    const TEST_INDEX: IndexTable = TableDefinition::new("test:index");

    /// Returns both the table and the TempDir so the directory is not
    /// deleted while the database is in use.
    fn test_table(capacity: usize) -> (RedbTable, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("bounded.redb");
        let db = Arc::new(Database::create(db_path).unwrap());
        (
            RedbTable::new(db, TEST_DATA, TEST_INDEX, capacity).unwrap(),
            dir,
        )
    }

    #[test]
    fn index_key_orders_descending() {
        let newer = index_key(2_000, "a");
        let older = index_key(1_000, "b");
        assert!(newer < older, "newer timestamps must sort first");
    }

    #[test]
    fn index_key_breaks_ties_by_id() {
        let a = index_key(1_000, "a");
        let b = index_key(1_000, "b");
        assert!(a < b);
    }

    #[test]
    fn put_then_load_returns_newest_first() {
        let (table, _dir) = test_table(100);

        table.put("one", 1_000, b"first").unwrap();
        table.put("two", 3_000, b"third").unwrap();
        table.put("three", 2_000, b"second").unwrap();

        let records = table.load_all().unwrap();
        assert_eq!(records, vec![b"third".to_vec(), b"second".to_vec(), b"first".to_vec()]);
    }

    #[test]
    fn load_all_on_empty_store_is_empty() {
        let (table, _dir) = test_table(100);
        assert!(table.load_all().unwrap().is_empty());
    }

    #[test]
    fn capacity_law_keeps_most_recent() {
        let (table, _dir) = test_table(100);

        for i in 0..150i64 {
            let id = format!("rec-{i}");
            table.put(&id, 1_000 + i, format!("payload-{i}").as_bytes()).unwrap();
        }

        assert_eq!(table.count().unwrap(), 100);
        let records = table.load_all().unwrap();
        assert_eq!(records.len(), 100);
        assert_eq!(records[0], b"payload-149".to_vec());
        assert_eq!(records[99], b"payload-50".to_vec());

        // The 50 oldest are gone from the data table too.
        for i in 0..50 {
            assert!(table.get(&format!("rec-{i}")).unwrap().is_none());
        }
    }

    #[test]
    fn reput_does_not_duplicate_or_leak_index_entries() {
        let (table, _dir) = test_table(100);

        table.put("dup", 1_000, b"old").unwrap();
        table.put("dup", 2_000, b"new").unwrap();

        assert_eq!(table.count().unwrap(), 1);
        let records = table.load_all().unwrap();
        assert_eq!(records, vec![b"new".to_vec()]);
    }

    #[test]
    fn delete_removes_record_and_reports_existence() {
        let (table, _dir) = test_table(100);

        table.put("gone", 1_000, b"x").unwrap();
        assert!(table.delete("gone").unwrap());
        assert!(!table.delete("gone").unwrap());
        assert!(table.load_all().unwrap().is_empty());
    }

    #[test]
    fn clear_empties_both_tables() {
        let (table, _dir) = test_table(100);

        for i in 0..5i64 {
            table.put(&format!("rec-{i}"), i, b"x").unwrap();
        }
        table.clear().unwrap();
        assert_eq!(table.count().unwrap(), 0);
        assert!(table.load_all().unwrap().is_empty());
    }
}
