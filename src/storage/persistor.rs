//! Background snapshot writer.
//!
//! The board mutates synchronously; the persistor picks up the newest
//! snapshot and writes it on a tokio task. Intermediate snapshots may be
//! skipped when writes fall behind, only the latest one is guaranteed to
//! land.

use crate::{
    error::{KanbanError, Result},
    storage::{Snapshot, Storage},
};
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

pub struct Persistor {
    tx: watch::Sender<Option<Snapshot>>,
    task: JoinHandle<()>,
}

impl Persistor {
    /// Spawns the writer task. Must be called inside a tokio runtime.
    pub fn spawn(storage: Arc<dyn Storage>) -> Self {
        let (tx, mut rx) = watch::channel::<Option<Snapshot>>(None);

        let task = tokio::spawn(async move {
            // Ends once the sender is dropped and the last value was seen
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                let Some(snapshot) = snapshot else {
                    continue;
                };

                match storage.save_snapshot(&snapshot).await {
                    Ok(()) => debug!(saved_at = %snapshot.saved_at, "snapshot persisted"),
                    Err(e) => warn!(error = %e, "failed to persist snapshot"),
                }
            }
        });

        Self { tx, task }
    }

    /// Queues a snapshot, replacing any not yet written
    pub fn submit(&self, snapshot: Snapshot) {
        self.tx.send_replace(Some(snapshot));
    }

    /// Writes the last queued snapshot and stops the task
    pub async fn close(self) -> Result<()> {
        drop(self.tx);
        self.task
            .await
            .map_err(|e| KanbanError::StorageError(format!("persistor task failed: {}", e)))
    }
}
