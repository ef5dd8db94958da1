//! Contract between the drag controller and the board.
//!
//! The controller reports where a drag ended; this module turns that into a
//! single [`MoveItem`] command, or nothing when the drop would not change
//! the board.

use crate::domain::{
    board::Board,
    ids::{ColumnId, ItemId},
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What an item was dropped on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropTarget {
    /// Empty space in a column; the item goes to the end
    Column { column_id: ColumnId },
    /// Another item; the dragged item takes its place
    Item { column_id: ColumnId, item_id: ItemId },
}

impl DropTarget {
    /// Classifies a raw "over" id from collision detection.
    ///
    /// Collision detection may report a column id even when the pointer is
    /// over a populated column, so column ids are checked first.
    pub fn classify(board: &Board, over_id: &str) -> Option<Self> {
        if let Some(col) = board.columns.iter().find(|c| c.id.as_str() == over_id) {
            return Some(Self::Column {
                column_id: col.id.clone(),
            });
        }

        board
            .all_items()
            .find(|item| item.id.as_str() == over_id)
            .map(|item| Self::Item {
                column_id: item.parent_id.clone(),
                item_id: item.id.clone(),
            })
    }

    pub fn column_id(&self) -> &ColumnId {
        match self {
            Self::Column { column_id } | Self::Item { column_id, .. } => column_id,
        }
    }

    pub fn anchor(&self) -> Option<&ItemId> {
        match self {
            Self::Column { .. } => None,
            Self::Item { item_id, .. } => Some(item_id),
        }
    }
}

/// Drag completion event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub item_id: ItemId,
    pub target_column_id: ColumnId,
    #[serde(default)]
    pub anchor_item_id: Option<ItemId>,
}

impl DragEnd {
    pub fn new(item_id: ItemId, target: DropTarget) -> Self {
        let anchor_item_id = target.anchor().cloned();
        Self {
            item_id,
            target_column_id: target.column_id().clone(),
            anchor_item_id,
        }
    }
}

/// The semantic move command applied to the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveItem {
    pub current_column_id: ColumnId,
    pub target_column_id: ColumnId,
    pub item_id: ItemId,
    #[serde(default)]
    pub anchor: Option<ItemId>,
}

impl MoveItem {
    /// Turns a finished drag into a move command.
    ///
    /// The source column comes from the item's current `parent_id` on the
    /// board. Returns `None` when the drag ended over nothing, references
    /// something no longer on the board, or would leave the order unchanged.
    pub fn resolve(board: &Board, event: Option<&DragEnd>) -> Option<Self> {
        let Some(event) = event else {
            trace!("drag ended over no target");
            return None;
        };
        if event.anchor_item_id.as_ref() == Some(&event.item_id) {
            trace!(item_id = %event.item_id, "item dropped on itself");
            return None;
        }

        let item = board.find_item(&event.item_id)?;
        let target = board.column(&event.target_column_id)?;
        let command = Self {
            current_column_id: item.parent_id.clone(),
            target_column_id: target.id.clone(),
            item_id: item.id.clone(),
            anchor: event.anchor_item_id.clone(),
        };

        if command.current_column_id == command.target_column_id {
            let from = target.position(&command.item_id)?;
            let last = target.items.len() - 1;
            let to = command
                .anchor
                .as_ref()
                .and_then(|anchor| target.position(anchor))
                .unwrap_or(target.items.len())
                .min(last);
            if from == to {
                trace!(item_id = %command.item_id, "drop leaves order unchanged");
                return None;
            }
        }

        Some(command)
    }

    pub fn apply(&self, board: &mut Board) -> bool {
        board.move_item(
            &self.current_column_id,
            &self.target_column_id,
            &self.item_id,
            self.anchor.as_ref(),
        )
    }
}
