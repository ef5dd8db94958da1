use crate::error::Result;
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;
pub mod persistor;
pub mod snapshot;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use persistor::Persistor;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};

/// Storage trait for persisting board snapshots under a single key
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves the snapshot, replacing any previous one
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    /// Loads the snapshot.
    ///
    /// Returns `KanbanError::BoardNotInitialized` when nothing was saved yet.
    async fn load_snapshot(&self) -> Result<Snapshot>;

    /// Discards the persisted snapshot. Purging empty storage is not an error.
    async fn purge(&self) -> Result<()>;

    /// Checks if a snapshot has been persisted
    async fn is_initialized(&self) -> bool;
}
