pub mod board;
pub mod comment;
pub mod drag;
pub mod ids;
pub mod item;

pub use board::{Board, BoardConfig, Column};
pub use comment::{Comment, CommentStore};
pub use drag::{DragEnd, DropTarget, MoveItem};
pub use ids::{ColumnId, CommentId, ItemId};
pub use item::{validate_title, Item, ItemDraft};
