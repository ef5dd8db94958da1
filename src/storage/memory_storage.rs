use crate::{
    error::{KanbanError, Result},
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-memory storage for ephemeral boards and tests.
///
/// Snapshots are kept in serialized form so loads go through the same
/// parsing and migration path as the durable backends.
#[derive(Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        *self.contents.lock().await = Some(json);
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        match self.contents.lock().await.as_deref() {
            Some(json) => Snapshot::from_json(json),
            None => Err(KanbanError::BoardNotInitialized),
        }
    }

    async fn purge(&self) -> Result<()> {
        *self.contents.lock().await = None;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.contents.lock().await.is_some()
    }
}
