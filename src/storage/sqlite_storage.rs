use crate::{
    config::PersistConfig,
    error::{KanbanError, Result},
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed key/value storage for board snapshots
pub struct SqliteStorage {
    connection: Mutex<Connection>,
    persist: PersistConfig,
}

fn storage_error(e: rusqlite::Error) -> KanbanError {
    KanbanError::StorageError(e.to_string())
}

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)";

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn new(database_path: &str, persist: PersistConfig) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(storage_error)?;
        Self::from_connection(connection, persist)
    }

    /// Opens a private in-memory database
    pub fn in_memory(persist: PersistConfig) -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::from_connection(connection, persist)
    }

    // The table exists from the start so an empty database reads as "nothing saved"
    fn from_connection(connection: Connection, persist: PersistConfig) -> Result<Self> {
        connection
            .execute(CREATE_TABLE, [])
            .map_err(storage_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
            persist,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| KanbanError::StorageError("sqlite connection poisoned".to_string()))
    }

    fn read_value(&self) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![self.persist.key],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_error)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(CREATE_TABLE, []).map_err(storage_error)?;
        Ok(())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.persist.key, json],
        )
        .map_err(storage_error)?;
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        match self.read_value()? {
            Some(json) => Snapshot::from_json(&json),
            None => Err(KanbanError::BoardNotInitialized),
        }
    }

    async fn purge(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![self.persist.key])
            .map_err(storage_error)?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        matches!(self.read_value(), Ok(Some(_)))
    }
}
