use crate::domain::{
    ids::{ColumnId, ItemId},
    item::Item,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// A named column holding an ordered sequence of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Column {
    pub fn new(name: String) -> Self {
        Self {
            id: ColumnId::generate(),
            name,
            items: Vec::new(),
        }
    }

    /// Index of the item within this column's sequence
    pub fn position(&self, item_id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == item_id)
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == item_id)
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Columns created on bootstrap and after a purge
    pub default_columns: Vec<String>,
    /// Prefix for generated column names ("Column 4")
    pub column_name_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_columns: vec![
                "To Do".to_string(),
                "In Progress".to_string(),
                "Done".to_string(),
            ],
            column_name_prefix: "Column".to_string(),
        }
    }
}

/// Kanban board state: ordered columns, each an ordered list of items.
///
/// Every mutation either applies completely or leaves the board untouched.
/// Missing column or item ids are not errors; the operation reports that
/// nothing changed. The configuration is not persisted with the board; it
/// comes from the caller on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(skip)]
    pub(crate) config: BoardConfig,
    pub(crate) columns: Vec<Column>,
    /// Drives generated column names; see `add_column`
    #[serde(default)]
    pub(crate) column_counter: u32,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        let columns: Vec<Column> = config
            .default_columns
            .iter()
            .map(|name| Column::new(name.clone()))
            .collect();
        let column_counter = columns.len() as u32;

        Self {
            config,
            columns,
            column_counter,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replaces the configuration. Existing columns are left alone; the new
    /// prefix and default columns apply from the next `add_column`/`reset`.
    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_counter(&self) -> u32 {
        self.column_counter
    }

    /// Resets to the configured default columns, dropping every item
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|col| &col.id == column_id)
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == column_id)
    }

    /// Finds an item anywhere on the board
    pub fn find_item(&self, item_id: &ItemId) -> Option<&Item> {
        self.columns.iter().find_map(|col| col.item(item_id))
    }

    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.columns.iter().flat_map(|col| col.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|col| col.items.len()).sum()
    }

    /// Checks that every item's `parent_id` names the column holding it and
    /// that no column or item id appears twice
    pub fn is_consistent(&self) -> bool {
        let mut column_ids = HashSet::new();
        let mut item_ids = HashSet::new();

        for col in &self.columns {
            if !column_ids.insert(&col.id) {
                return false;
            }
            for item in &col.items {
                if item.parent_id != col.id || !item_ids.insert(&item.id) {
                    return false;
                }
            }
        }
        true
    }

    /// Appends a column named from the column counter
    pub fn add_column(&mut self) -> ColumnId {
        self.column_counter += 1;
        let name = format!("{} {}", self.config.column_name_prefix, self.column_counter);
        let column = Column::new(name);
        let id = column.id.clone();

        debug!(column_id = %id, name = %column.name, "column added");
        self.columns.push(column);
        id
    }

    /// Removes a column together with all of its items
    pub fn remove_column(&mut self, column_id: &ColumnId) -> bool {
        let Some(index) = self.column_index(column_id) else {
            trace!(column_id = %column_id, "remove_column: column not found");
            return false;
        };

        let removed = self.columns.remove(index);
        self.column_counter = self.column_counter.saturating_sub(1);
        debug!(
            column_id = %column_id,
            items = removed.items.len(),
            "column removed"
        );
        true
    }

    /// Renames a column. Blank names are rejected by the caller.
    pub fn rename_column(&mut self, column_id: &ColumnId, name: String) -> bool {
        let Some(index) = self.column_index(column_id) else {
            trace!(column_id = %column_id, "rename_column: column not found");
            return false;
        };

        self.columns[index].name = name;
        debug!(column_id = %column_id, "column renamed");
        true
    }

    /// Appends a new item to the column
    pub fn add_item(&mut self, column_id: &ColumnId, title: String) -> Option<ItemId> {
        let Some(index) = self.column_index(column_id) else {
            trace!(column_id = %column_id, "add_item: column not found");
            return None;
        };

        let item = Item::new(column_id.clone(), title);
        let id = item.id.clone();
        self.columns[index].items.push(item);
        debug!(column_id = %column_id, item_id = %id, "item added");
        Some(id)
    }

    /// Removes an item from the column, returning it
    pub fn remove_item(&mut self, column_id: &ColumnId, item_id: &ItemId) -> Option<Item> {
        let col = self.column_index(column_id)?;
        let Some(pos) = self.columns[col].position(item_id) else {
            trace!(column_id = %column_id, item_id = %item_id, "remove_item: item not found");
            return None;
        };

        debug!(column_id = %column_id, item_id = %item_id, "item removed");
        Some(self.columns[col].items.remove(pos))
    }

    /// Replaces an item with an edited copy.
    ///
    /// The item is looked up in the column named by `item.parent_id`. When
    /// `updated_parent_id` differs, the item leaves that column and is
    /// appended to the end of the new one.
    pub fn update_item(&mut self, item: Item, updated_parent_id: &ColumnId) -> bool {
        let Some(source) = self.column_index(&item.parent_id) else {
            trace!(item_id = %item.id, "update_item: column not found");
            return false;
        };
        let Some(pos) = self.columns[source].position(&item.id) else {
            trace!(item_id = %item.id, "update_item: item not found");
            return false;
        };

        if &item.parent_id == updated_parent_id {
            debug!(item_id = %item.id, "item updated");
            self.columns[source].items[pos] = item;
            return true;
        }

        let Some(target) = self.column_index(updated_parent_id) else {
            trace!(item_id = %item.id, column_id = %updated_parent_id, "update_item: target column not found");
            return false;
        };

        let mut item = item;
        self.columns[source].items.remove(pos);
        item.parent_id = updated_parent_id.clone();
        debug!(item_id = %item.id, column_id = %updated_parent_id, "item updated and relocated");
        self.columns[target].items.push(item);
        true
    }

    /// Moves an item between (or within) columns.
    ///
    /// With no `anchor` the item is appended to the target column. With an
    /// anchor it is inserted at the anchor's index, measured before the item
    /// is taken out of its source column. An anchor that is not in the
    /// target column falls back to appending.
    pub fn move_item(
        &mut self,
        current_column_id: &ColumnId,
        target_column_id: &ColumnId,
        item_id: &ItemId,
        anchor: Option<&ItemId>,
    ) -> bool {
        let (Some(source), Some(target)) = (
            self.column_index(current_column_id),
            self.column_index(target_column_id),
        ) else {
            trace!(item_id = %item_id, "move_item: column not found");
            return false;
        };
        let Some(from) = self.columns[source].position(item_id) else {
            trace!(item_id = %item_id, "move_item: item not in source column");
            return false;
        };

        let target_len = self.columns[target].items.len();
        let insert_at = match anchor {
            None => target_len,
            Some(anchor_id) => self.columns[target]
                .position(anchor_id)
                .unwrap_or(target_len),
        };

        let mut item = self.columns[source].items.remove(from);
        item.parent_id = self.columns[target].id.clone();

        let items = &mut self.columns[target].items;
        let insert_at = insert_at.min(items.len());
        items.insert(insert_at, item);

        debug!(
            item_id = %item_id,
            from = %current_column_id,
            to = %target_column_id,
            index = insert_at,
            "item moved"
        );
        true
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}
