use crate::{
    domain::{Board, Comment, CommentStore, ItemId},
    error::{KanbanError, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Schema version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted form of the board and its comments.
///
/// Version 0 snapshots predate comments and the column counter; they are
/// upgraded on load. Dialog state is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    pub board: Board,
    #[serde(default)]
    pub comments: HashMap<ItemId, Vec<Comment>>,
}

impl Snapshot {
    pub fn new(board: &Board, comments: &CommentStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            board: board.clone(),
            comments: comments.comments.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a stored snapshot and migrates it to the current version
    pub fn from_json(contents: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(contents)?;
        snapshot.migrate()
    }

    fn migrate(mut self) -> Result<Self> {
        if self.version > SNAPSHOT_VERSION {
            return Err(KanbanError::UnsupportedSnapshotVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        if self.version == 0 {
            if self.board.column_counter == 0 {
                self.board.column_counter = self.board.columns.len() as u32;
            }
            info!(from = 0, to = SNAPSHOT_VERSION, "migrated snapshot");
            self.version = SNAPSHOT_VERSION;
        }

        if !self.board.is_consistent() {
            warn!("loaded snapshot has inconsistent item parent links");
        }
        Ok(self)
    }
}
