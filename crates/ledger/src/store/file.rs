//! Durable store backend on top of redb.

use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition};
use tracing::info;

use super::{KeyValueStore, StorageError};

/// Single table holding every ledger collection, keyed by collection name.
const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

/// A [`KeyValueStore`] persisted in an embedded redb database file.
///
/// Durable across process restarts and scoped to one machine, matching the
/// browser-profile storage it replaces. Each `get`/`set`/`remove` runs in its
/// own transaction; cross-key atomicity is the ledger's job.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the database cannot be opened or
    /// initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "opening store");

        let db = Database::create(&path).map_err(backend)?;

        // Ensure the table exists so reads on a fresh file don't fail.
        let write_txn = db.begin_write().map_err(backend)?;
        write_txn.open_table(ENTRIES).map_err(backend)?;
        write_txn.commit().map_err(backend)?;

        Ok(Self { db, path })
    }

    /// The store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(ENTRIES).map_err(backend)?;
        let value = table.get(key).map_err(backend)?;
        Ok(value.map(|v| v.value().to_owned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(backend)?;
            table.insert(key, value).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(backend)?;
            table.remove(key).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(ENTRIES).map_err(backend)?;
        let mut keys = Vec::new();
        for entry in table.range::<&str>(..).map_err(backend)? {
            let (key, _value) = entry.map_err(backend)?;
            keys.push(key.value().to_owned());
        }
        Ok(keys)
    }
}

fn backend(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(err.to_string())
}
