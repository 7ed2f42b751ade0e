//! Burnbox Storage - bounded local persistence for inbox records.
//!
//! This crate provides the persistence layer for Burnbox, using redb as the
//! embedded database. Each record kind gets a data table keyed by id plus a
//! secondary index ordered by reverse timestamp, so retrieval is always a
//! descending-timestamp scan and every write trims past the capacity.
//!
//! When no durable backing can be opened, construction degrades to an
//! in-process variant with the same contract; the selected backend is
//! surfaced through [`StoreBackend`] rather than hidden.
//!
//! # Tables
//!
//! - `credentials:data/index` - Fabricated credential records
//! - `messages:data/index` - Synthetic inbox messages
//! - `inbox_config` - Inbox configuration

pub mod config;
pub mod credential;
pub mod message;
pub mod time_utils;

mod bounded;
mod error;
mod memory;

use redb::Database;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use bounded::{RedbTable, TableBackend};
use credential::{CREDENTIAL_DATA, CREDENTIAL_INDEX};
use memory::MemoryTable;
use message::{MESSAGE_DATA, MESSAGE_INDEX};

pub use bounded::StoreBackend;
pub use config::{ConfigStorage, InboxConfig};
pub use credential::{CredentialRecord, CredentialStore, Strength};
pub use error::{Result, StorageError};
pub use message::{MessageRecord, MessageStore};

/// Central storage manager wiring both record stores and the configuration
/// table over one backing.
pub struct Storage {
    backend: StoreBackend,
    pub credentials: CredentialStore,
    pub messages: MessageStore,
    pub config: ConfigStorage,
}

impl Storage {
    /// Open the stores at the given path, probing capability once: when the
    /// database cannot be created there, degrade to the in-memory variant
    /// instead of failing the caller. The difference is observable through
    /// [`Storage::backend`].
    pub fn open(path: &Path) -> Self {
        match Self::open_persistent(path) {
            Ok(storage) => {
                info!(path = %path.display(), "Opened persistent record store");
                storage
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %path.display(),
                    "Persistent backing unavailable, records will not survive restart"
                );
                Self::in_memory()
            }
        }
    }

    /// Open at the platform data directory (`<data_dir>/burnbox/burnbox.redb`).
    pub fn open_default() -> Self {
        Self::open(&default_db_path())
    }

    /// Construct the process-lifetime fallback directly.
    pub fn in_memory() -> Self {
        let capacity = InboxConfig::default().store_capacity;
        Self {
            backend: StoreBackend::Memory,
            credentials: CredentialStore::new(TableBackend::Memory(MemoryTable::new(capacity))),
            messages: MessageStore::new(TableBackend::Memory(MemoryTable::new(capacity))),
            config: ConfigStorage::new_memory(),
        }
    }

    fn open_persistent(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        }
        let db = Database::create(path)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        let db = Arc::new(db);

        let config = ConfigStorage::new_persistent(db.clone())?;
        let capacity = config.get()?.store_capacity;

        let credentials = CredentialStore::new(TableBackend::Redb(RedbTable::new(
            db.clone(),
            CREDENTIAL_DATA,
            CREDENTIAL_INDEX,
            capacity,
        )?));
        let messages = MessageStore::new(TableBackend::Redb(RedbTable::new(
            db.clone(),
            MESSAGE_DATA,
            MESSAGE_INDEX,
            capacity,
        )?));

        Ok(Self {
            backend: StoreBackend::Persistent,
            credentials,
            messages,
            config,
        })
    }

    /// The backend selected at construction.
    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    pub fn is_persistent(&self) -> bool {
        self.backend == StoreBackend::Persistent
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("burnbox")
        .join("burnbox.redb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_reports_persistent_backend() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("inbox.redb"));
        assert_eq!(storage.backend(), StoreBackend::Persistent);
        assert!(storage.is_persistent());
    }

    #[test]
    fn unwritable_path_falls_back_to_memory() {
        let dir = tempdir().unwrap();
        // A plain file where a directory is needed makes creation fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let storage = Storage::open(&blocker.join("sub").join("inbox.redb"));
        assert_eq!(storage.backend(), StoreBackend::Memory);

        // The fallback still honors the full store contract.
        let record = CredentialRecord::new(
            "echo7k2p@trashmail.dev".to_string(),
            "aB3$efGh1jK!".to_string(),
            Strength::Medium,
        );
        storage.credentials.put(&record).unwrap();
        assert_eq!(storage.credentials.count().unwrap(), 1);
        assert_eq!(storage.credentials.load_all().unwrap()[0].id, record.id);
    }

    #[test]
    fn stores_are_independent() {
        let storage = Storage::in_memory();

        let credential = CredentialRecord::new(
            "a@burnbox.io".to_string(),
            "pw".to_string(),
            Strength::Weak,
        );
        storage.credentials.put(&credential).unwrap();

        assert_eq!(storage.credentials.count().unwrap(), 1);
        assert_eq!(storage.messages.count().unwrap(), 0);
    }
}
