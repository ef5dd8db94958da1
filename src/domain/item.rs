use crate::{
    domain::ids::{ColumnId, ItemId},
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Id of the column whose item sequence currently holds this item
    pub parent_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl Item {
    /// Creates a new item inside the given column
    pub fn new(parent_id: ColumnId, title: String) -> Self {
        Self {
            id: ItemId::generate(),
            parent_id,
            title,
            description: String::new(),
            labels: BTreeSet::new(),
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Sets the description
    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }
}

/// Rejects titles that are empty after trimming
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(KanbanError::TitleRequired);
    }
    Ok(())
}

/// Edits made in the item-detail dialog, applied on save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Column the item should live in after the save
    pub column: ColumnId,
}

impl ItemDraft {
    /// Starts a draft from the item's current values
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            column: item.parent_id.clone(),
        }
    }

    /// Validates the draft and produces the updated item.
    ///
    /// The returned item keeps its current `parent_id`; the column change is
    /// carried separately by `self.column` so the board can relocate it.
    pub fn apply_to(&self, item: &Item) -> Result<Item> {
        validate_title(&self.title)?;

        let mut updated = item.clone();
        updated.set_title(self.title.clone());
        updated.set_description(self.description.clone());
        Ok(updated)
    }
}
