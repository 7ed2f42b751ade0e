//! Inbox configuration storage.

use anyhow::Result as AnyResult;
use parking_lot::RwLock;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("inbox_config");
const CONFIG_KEY: &str = "inbox";

// Default configuration constants
const DEFAULT_STORE_CAPACITY: usize = 100;
const DEFAULT_DISPLAY_CAP: usize = 150;
const DEFAULT_MIN_DELAY_SECONDS: u64 = 10;
const DEFAULT_MAX_DELAY_SECONDS: u64 = 30;

/// Inbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// Records retained per store; oldest evicted first.
    pub store_capacity: usize,
    /// Records handed to the UI-facing list at most.
    pub display_cap: usize,
    /// Lower bound of the jittered delivery delay.
    pub min_delay_seconds: u64,
    /// Upper bound of the jittered delivery delay.
    pub max_delay_seconds: u64,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            store_capacity: DEFAULT_STORE_CAPACITY,
            display_cap: DEFAULT_DISPLAY_CAP,
            min_delay_seconds: DEFAULT_MIN_DELAY_SECONDS,
            max_delay_seconds: DEFAULT_MAX_DELAY_SECONDS,
        }
    }
}

impl InboxConfig {
    /// Validate configuration values
    pub fn validate(&self) -> AnyResult<()> {
        if self.store_capacity == 0 {
            return Err(anyhow::anyhow!("Store capacity must be at least 1"));
        }

        if self.display_cap == 0 {
            return Err(anyhow::anyhow!("Display cap must be at least 1"));
        }

        if self.max_delay_seconds == 0 {
            return Err(anyhow::anyhow!("Max delivery delay must be at least 1 second"));
        }

        if self.min_delay_seconds > self.max_delay_seconds {
            return Err(anyhow::anyhow!(
                "Min delivery delay {}s exceeds max {}s",
                self.min_delay_seconds,
                self.max_delay_seconds
            ));
        }

        Ok(())
    }
}

enum ConfigBackend {
    Redb(Arc<Database>),
    Memory(RwLock<InboxConfig>),
}

/// Configuration storage; persists alongside the record tables or lives in
/// memory when the store fell back.
pub struct ConfigStorage {
    inner: ConfigBackend,
}

impl ConfigStorage {
    pub(crate) fn new_persistent(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONFIG_TABLE)?;
            if table.get(CONFIG_KEY)?.is_none() {
                let defaults = serde_json::to_vec(&InboxConfig::default())?;
                table.insert(CONFIG_KEY, defaults.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(Self {
            inner: ConfigBackend::Redb(db),
        })
    }

    pub(crate) fn new_memory() -> Self {
        Self {
            inner: ConfigBackend::Memory(RwLock::new(InboxConfig::default())),
        }
    }

    pub fn get(&self) -> Result<InboxConfig> {
        match &self.inner {
            ConfigBackend::Redb(db) => {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(CONFIG_TABLE)?;
                match table.get(CONFIG_KEY)? {
                    Some(bytes) => Ok(serde_json::from_slice(bytes.value())?),
                    None => Ok(InboxConfig::default()),
                }
            }
            ConfigBackend::Memory(config) => Ok(config.read().clone()),
        }
    }

    pub fn set(&self, config: &InboxConfig) -> Result<()> {
        match &self.inner {
            ConfigBackend::Redb(db) => {
                let write_txn = db.begin_write()?;
                {
                    let mut table = write_txn.open_table(CONFIG_TABLE)?;
                    let bytes = serde_json::to_vec(config)?;
                    table.insert(CONFIG_KEY, bytes.as_slice())?;
                }
                write_txn.commit()?;
                Ok(())
            }
            ConfigBackend::Memory(slot) => {
                *slot.write() = config.clone();
                Ok(())
            }
        }
    }
}
