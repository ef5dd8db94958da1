//! # Kanban Core
//!
//! Board state machine for a single-page kanban board.
//!
//! This crate owns the ordered columns and items of a board, the comments
//! attached to items, the drag-and-drop move algorithm, and the snapshot
//! persistence of that state, without any dependency on a particular UI.

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{KanbanConfig, PersistConfig};
pub use domain::{
    board::{Board, BoardConfig, Column},
    comment::{Comment, CommentStore},
    drag::{DragEnd, DropTarget, MoveItem},
    ids::{ColumnId, CommentId, ItemId},
    item::{Item, ItemDraft},
};
pub use error::{KanbanError, Result};
pub use storage::{Snapshot, Storage};
pub use store::{Command, KanbanStore};
