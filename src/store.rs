//! The owned board state container.
//!
//! `KanbanStore` is the only thing that mutates the board and its comments.
//! UI layers hold it (or a handle to it) and call its command methods, or
//! send serialized [`Command`]s through [`KanbanStore::dispatch`]. After
//! every change to persisted state the attached [`Persistor`], if any, is
//! handed a fresh snapshot.

use crate::{
    domain::{
        validate_title, Board, BoardConfig, ColumnId, Comment, CommentId, CommentStore, DragEnd,
        Item, ItemDraft, ItemId, MoveItem,
    },
    error::{KanbanError, Result},
    storage::{Persistor, Snapshot, Storage},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A command sent by the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddColumn,
    RemoveColumn {
        column_id: ColumnId,
    },
    RenameColumn {
        column_id: ColumnId,
        name: String,
    },
    AddItem {
        column_id: ColumnId,
        title: String,
    },
    RemoveItem {
        column_id: ColumnId,
        item_id: ItemId,
    },
    UpdateItem {
        item: Item,
        updated_parent_id: ColumnId,
    },
    MoveItem(MoveItem),
    DragEnd(DragEnd),
    ToggleDialog,
    SetCurrentItem {
        item: Item,
    },
    AddComment {
        item_id: ItemId,
        content: String,
        #[serde(default)]
        parent_id: Option<CommentId>,
    },
    EditComment {
        item_id: ItemId,
        comment_id: CommentId,
        content: String,
    },
    DeleteComment {
        item_id: ItemId,
        comment_id: CommentId,
    },
}

#[derive(Default)]
pub struct KanbanStore {
    board: Board,
    comments: CommentStore,
    persistor: Option<Persistor>,
}

impl KanbanStore {
    /// Creates a store bootstrapped with the configured default columns
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: Board::new(config),
            comments: CommentStore::new(),
            persistor: None,
        }
    }

    /// Restores a saved board under the current configuration
    pub fn from_snapshot(snapshot: Snapshot, config: BoardConfig) -> Self {
        let mut board = snapshot.board;
        board.set_config(config);
        Self {
            board,
            comments: CommentStore::with_comments(snapshot.comments),
            persistor: None,
        }
    }

    /// Rehydrates from storage, bootstrapping defaults when nothing was saved
    pub async fn load(storage: &dyn Storage, config: BoardConfig) -> Result<Self> {
        match storage.load_snapshot().await {
            Ok(snapshot) => {
                info!(
                    columns = snapshot.board.columns().len(),
                    items = snapshot.board.item_count(),
                    "board rehydrated"
                );
                Ok(Self::from_snapshot(snapshot, config))
            }
            Err(KanbanError::BoardNotInitialized) => {
                info!("no saved board, starting from defaults");
                Ok(Self::new(config))
            }
            Err(e) => Err(e),
        }
    }

    /// Hands every future snapshot to the persistor
    pub fn attach(&mut self, persistor: Persistor) {
        self.persistor = Some(persistor);
    }

    pub fn detach(&mut self) -> Option<Persistor> {
        self.persistor.take()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.board, &self.comments)
    }

    fn persist_if(&self, changed: bool) -> bool {
        if changed {
            if let Some(persistor) = &self.persistor {
                persistor.submit(self.snapshot());
            }
        }
        changed
    }

    /// Discards persisted state and resets to the default columns,
    /// including the column counter, comments and dialog state
    pub async fn purge(&mut self, storage: &dyn Storage) -> Result<()> {
        storage.purge().await?;
        self.board.reset();
        self.comments.reset();
        info!("board purged");
        self.persist_if(true);
        Ok(())
    }

    pub fn add_column(&mut self) -> ColumnId {
        let id = self.board.add_column();
        self.persist_if(true);
        id
    }

    pub fn remove_column(&mut self, column_id: &ColumnId) -> bool {
        let changed = self.board.remove_column(column_id);
        self.persist_if(changed)
    }

    /// Renames a column; blank names are rejected
    pub fn rename_column(&mut self, column_id: &ColumnId, name: String) -> Result<bool> {
        if name.trim().is_empty() {
            return Err(KanbanError::EmptyColumnName);
        }
        let changed = self.board.rename_column(column_id, name);
        Ok(self.persist_if(changed))
    }

    /// Adds an item; blank titles are rejected
    pub fn add_item(&mut self, column_id: &ColumnId, title: String) -> Result<Option<ItemId>> {
        validate_title(&title)?;
        let id = self.board.add_item(column_id, title);
        self.persist_if(id.is_some());
        Ok(id)
    }

    pub fn remove_item(&mut self, column_id: &ColumnId, item_id: &ItemId) -> bool {
        let changed = self.board.remove_item(column_id, item_id).is_some();
        self.persist_if(changed)
    }

    pub fn update_item(&mut self, item: Item, updated_parent_id: &ColumnId) -> bool {
        let changed = self.board.update_item(item, updated_parent_id);
        self.persist_if(changed)
    }

    pub fn move_item(
        &mut self,
        current_column_id: &ColumnId,
        target_column_id: &ColumnId,
        item_id: &ItemId,
        anchor: Option<&ItemId>,
    ) -> bool {
        let changed = self
            .board
            .move_item(current_column_id, target_column_id, item_id, anchor);
        self.persist_if(changed)
    }

    /// Applies a finished drag. Drags that resolve to no move are ignored.
    pub fn drag_end(&mut self, event: Option<&DragEnd>) -> bool {
        match MoveItem::resolve(&self.board, event) {
            Some(command) => {
                let changed = command.apply(&mut self.board);
                self.persist_if(changed)
            }
            None => false,
        }
    }

    /// Flips the dialog. Opening with no current item is ignored.
    pub fn toggle_dialog(&mut self) -> bool {
        self.comments.toggle_dialog()
    }

    pub fn set_current_item(&mut self, item: Item) {
        self.comments.set_current_item(item);
    }

    /// Opens the detail dialog for an item currently on the board
    pub fn open_item(&mut self, item_id: &ItemId) -> bool {
        match self.board.find_item(item_id) {
            Some(item) => {
                self.comments.open_dialog(item.clone());
                true
            }
            None => false,
        }
    }

    /// Saves the detail dialog: validates the draft, applies it to the
    /// current item and closes the dialog.
    ///
    /// A blank title leaves the dialog open and returns `TitleRequired`.
    /// Saving with no current item is a no-op.
    pub fn save_dialog(&mut self, draft: &ItemDraft) -> Result<bool> {
        let Some(current) = self.comments.current_item() else {
            return Ok(false);
        };

        let updated = draft.apply_to(current)?;
        let changed = self.board.update_item(updated, &draft.column);
        self.comments.close_dialog();
        Ok(self.persist_if(changed))
    }

    pub fn comments_for(&self, item_id: &ItemId) -> &[Comment] {
        self.comments.comments_for(item_id)
    }

    pub fn add_comment(
        &mut self,
        item_id: &ItemId,
        content: String,
        parent_id: Option<CommentId>,
    ) -> CommentId {
        let id = self.comments.add_comment(item_id, content, parent_id);
        self.persist_if(true);
        id
    }

    pub fn edit_comment(&mut self, item_id: &ItemId, comment_id: &CommentId, content: String) -> bool {
        let changed = self.comments.edit_comment(item_id, comment_id, content);
        self.persist_if(changed)
    }

    pub fn delete_comment(&mut self, item_id: &ItemId, comment_id: &CommentId) -> bool {
        let changed = self.comments.delete_comment(item_id, comment_id);
        self.persist_if(changed)
    }

    /// Applies a command, returning whether any state changed
    pub fn dispatch(&mut self, command: Command) -> Result<bool> {
        let changed = match command {
            Command::AddColumn => {
                self.add_column();
                true
            }
            Command::RemoveColumn { column_id } => self.remove_column(&column_id),
            Command::RenameColumn { column_id, name } => self.rename_column(&column_id, name)?,
            Command::AddItem { column_id, title } => self.add_item(&column_id, title)?.is_some(),
            Command::RemoveItem { column_id, item_id } => self.remove_item(&column_id, &item_id),
            Command::UpdateItem {
                item,
                updated_parent_id,
            } => self.update_item(item, &updated_parent_id),
            Command::MoveItem(command) => self.move_item(
                &command.current_column_id,
                &command.target_column_id,
                &command.item_id,
                command.anchor.as_ref(),
            ),
            Command::DragEnd(event) => self.drag_end(Some(&event)),
            Command::ToggleDialog => self.toggle_dialog(),
            Command::SetCurrentItem { item } => {
                self.set_current_item(item);
                true
            }
            Command::AddComment {
                item_id,
                content,
                parent_id,
            } => {
                self.add_comment(&item_id, content, parent_id);
                true
            }
            Command::EditComment {
                item_id,
                comment_id,
                content,
            } => self.edit_comment(&item_id, &comment_id, content),
            Command::DeleteComment {
                item_id,
                comment_id,
            } => self.delete_comment(&item_id, &comment_id),
        };
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn column(store: &KanbanStore, n: usize) -> ColumnId {
        store.board().columns[n].id.clone()
    }

    #[test]
    fn test_write_spec_scenario() {
        let mut store = KanbanStore::default();
        let col1 = column(&store, 0);
        let col2 = column(&store, 1);

        let id = store
            .add_item(&col1, "Write spec".to_string())
            .unwrap()
            .unwrap();
        let item = &store.board().columns[0].items[0];
        assert_eq!(item.title, "Write spec");
        assert_eq!(item.parent_id, col1);

        assert!(store.move_item(&col1, &col2, &id, None));
        assert!(store.board().columns[0].items.is_empty());
        assert_eq!(store.board().columns[1].items.len(), 1);
        assert_eq!(store.board().columns[1].items[0].parent_id, col2);
    }

    #[test]
    fn test_boundary_validation() {
        let mut store = KanbanStore::default();
        let col = column(&store, 0);

        assert!(matches!(
            store.add_item(&col, "  ".to_string()),
            Err(KanbanError::TitleRequired)
        ));
        assert!(matches!(
            store.rename_column(&col, "".to_string()),
            Err(KanbanError::EmptyColumnName)
        ));
        assert_eq!(store.board().item_count(), 0);
        assert_eq!(store.board().columns[0].name, "To Do");
    }

    #[test]
    fn test_dialog_save_flow() {
        let mut store = KanbanStore::default();
        let col1 = column(&store, 0);
        let col2 = column(&store, 1);
        store.add_item(&col1, "Other".to_string()).unwrap();
        let id = store.add_item(&col1, "Draft".to_string()).unwrap().unwrap();
        store.add_item(&col2, "Existing".to_string()).unwrap();

        assert!(store.open_item(&id));
        assert!(store.comments().is_dialog_open());

        let mut draft = ItemDraft::from_item(store.comments().current_item().unwrap());
        draft.title = String::new();
        assert!(matches!(
            store.save_dialog(&draft),
            Err(KanbanError::TitleRequired)
        ));
        // Failed save leaves the dialog open
        assert!(store.comments().is_dialog_open());

        draft.title = "Final".to_string();
        draft.description = "Details".to_string();
        draft.column = col2.clone();
        assert!(store.save_dialog(&draft).unwrap());

        assert!(!store.comments().is_dialog_open());
        assert!(store.comments().current_item().is_none());
        let titles: Vec<&str> = store.board().columns[1]
            .items
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Existing", "Final"]);
        assert_eq!(store.board().find_item(&id).unwrap().parent_id, col2);
        assert!(store.board().is_consistent());
    }

    #[test]
    fn test_save_dialog_without_current_item() {
        let mut store = KanbanStore::default();
        let draft = ItemDraft {
            title: "x".to_string(),
            description: String::new(),
            column: column(&store, 0),
        };
        assert!(!store.save_dialog(&draft).unwrap());
    }

    #[test]
    fn test_open_unknown_item() {
        let mut store = KanbanStore::default();
        assert!(!store.open_item(&ItemId::from("ghost")));
        assert!(!store.comments().is_dialog_open());
    }

    #[test]
    fn test_comment_scenario() {
        let mut store = KanbanStore::default();
        let col = column(&store, 0);
        let item = store.add_item(&col, "Item".to_string()).unwrap().unwrap();

        let comment = store.add_comment(&item, "hello".to_string(), None);
        assert!(store.edit_comment(&item, &comment, "hello!".to_string()));

        let thread = store.comments_for(&item);
        assert_eq!(thread[0].content, "hello!");
        assert!(thread[0].edited);
    }

    #[test]
    fn test_comments_survive_item_and_column_removal() {
        let mut store = KanbanStore::default();
        let col = column(&store, 0);
        let item = store.add_item(&col, "Item".to_string()).unwrap().unwrap();
        store.add_comment(&item, "audit".to_string(), None);

        assert!(store.remove_item(&col, &item));
        assert_eq!(store.comments_for(&item).len(), 1);

        let item = store.add_item(&col, "Item".to_string()).unwrap().unwrap();
        store.add_comment(&item, "audit".to_string(), None);
        assert!(store.remove_column(&col));
        assert_eq!(store.comments_for(&item).len(), 1);
    }

    #[test]
    fn test_drag_end() {
        let mut store = KanbanStore::default();
        let x = column(&store, 0);
        let a = store.add_item(&x, "A".to_string()).unwrap().unwrap();
        let b = store.add_item(&x, "B".to_string()).unwrap().unwrap();

        assert!(!store.drag_end(None));

        let event = DragEnd {
            item_id: b.clone(),
            target_column_id: x.clone(),
            anchor_item_id: Some(a.clone()),
        };
        assert!(store.drag_end(Some(&event)));

        let order: Vec<&ItemId> = store.board().columns[0].items.iter().map(|i| &i.id).collect();
        assert_eq!(order, vec![&b, &a]);
    }

    #[test]
    fn test_dispatch_json_commands() {
        let mut store = KanbanStore::default();
        let col = column(&store, 0);

        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "add_item",
            "column_id": col.as_str(),
            "title": "From JSON"
        }))
        .unwrap();
        assert!(store.dispatch(command).unwrap());
        let item = store.board().columns[0].items[0].clone();

        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "move_item",
            "current_column_id": col.as_str(),
            "target_column_id": column(&store, 2).as_str(),
            "item_id": item.id.as_str()
        }))
        .unwrap();
        assert!(store.dispatch(command).unwrap());
        assert_eq!(store.board().columns[2].items.len(), 1);

        assert!(store.dispatch(Command::AddColumn).unwrap());
        assert_eq!(store.board().columns[3].name, "Column 4");

        let missing = Command::RemoveColumn {
            column_id: ColumnId::from("missing"),
        };
        assert!(!store.dispatch(missing).unwrap());
    }

    #[test]
    fn test_dispatch_dialog_commands() {
        let mut store = KanbanStore::default();
        let col = column(&store, 0);
        store.add_item(&col, "A".to_string()).unwrap();
        let item = store.board().columns[0].items[0].clone();

        store
            .dispatch(Command::SetCurrentItem { item: item.clone() })
            .unwrap();
        store.dispatch(Command::ToggleDialog).unwrap();
        assert!(store.comments().is_dialog_open());
        assert_eq!(store.comments().current_item(), Some(&item));

        store.dispatch(Command::ToggleDialog).unwrap();
        assert!(store.comments().current_item().is_none());
    }

    #[test]
    fn test_dispatch_toggle_without_item_keeps_dialog_closed() {
        let mut store = KanbanStore::default();

        assert!(!store.dispatch(Command::ToggleDialog).unwrap());
        assert!(!store.comments().is_dialog_open());
        assert!(store.comments().current_item().is_none());
    }

    #[test]
    fn test_dispatch_drag_end() {
        let mut store = KanbanStore::default();
        let x = column(&store, 0);
        let y = column(&store, 1);
        let a = store.add_item(&x, "A".to_string()).unwrap().unwrap();
        let b = store.add_item(&x, "B".to_string()).unwrap().unwrap();

        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "drag_end",
            "item_id": b.as_str(),
            "target_column_id": x.as_str(),
            "anchor_item_id": a.as_str()
        }))
        .unwrap();
        assert!(store.dispatch(command).unwrap());
        let order: Vec<&ItemId> = store.board().columns[0].items.iter().map(|i| &i.id).collect();
        assert_eq!(order, vec![&b, &a]);

        // Dropping an item on itself changes nothing
        let onto_self = Command::DragEnd(DragEnd {
            item_id: a.clone(),
            target_column_id: x.clone(),
            anchor_item_id: Some(a.clone()),
        });
        let before = store.board().clone();
        assert!(!store.dispatch(onto_self).unwrap());
        assert_eq!(store.board(), &before);

        let to_column = Command::DragEnd(DragEnd {
            item_id: a.clone(),
            target_column_id: y.clone(),
            anchor_item_id: None,
        });
        assert!(store.dispatch(to_column).unwrap());
        assert_eq!(store.board().find_item(&a).unwrap().parent_id, y);
    }

    #[test]
    fn test_dispatch_rejects_blank_title() {
        let mut store = KanbanStore::default();
        let command = Command::AddItem {
            column_id: column(&store, 0),
            title: "".to_string(),
        };
        assert!(matches!(
            store.dispatch(command),
            Err(KanbanError::TitleRequired)
        ));
    }

    #[tokio::test]
    async fn test_reload_reproduces_state() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = KanbanStore::load(&*storage, BoardConfig::default())
            .await
            .unwrap();
        store.attach(Persistor::spawn(storage.clone()));

        let col = column(&store, 0);
        let item = store.add_item(&col, "Persist me".to_string()).unwrap().unwrap();
        store.add_comment(&item, "note".to_string(), None);
        store.add_column();

        store.detach().unwrap().close().await.unwrap();

        let reloaded = KanbanStore::load(&*storage, BoardConfig::default())
            .await
            .unwrap();
        assert_eq!(reloaded.board(), store.board());
        assert_eq!(reloaded.comments().threads(), store.comments().threads());
    }

    #[tokio::test]
    async fn test_purge_resets_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = KanbanStore::default();
        store.attach(Persistor::spawn(storage.clone()));

        let col = column(&store, 0);
        let item = store.add_item(&col, "Gone".to_string()).unwrap().unwrap();
        store.add_comment(&item, "gone too".to_string(), None);
        store.add_column();
        store.add_column();
        store.open_item(&item);

        store.purge(&*storage).await.unwrap();

        assert_eq!(store.board().columns.len(), 3);
        assert_eq!(store.board().column_counter, 3);
        assert_eq!(store.board().item_count(), 0);
        assert!(store.comments_for(&item).is_empty());
        assert!(!store.comments().is_dialog_open());

        // The counter restarts after a purge
        assert_eq!(
            store.board().column(&store.board().columns[2].id).unwrap().name,
            "Done"
        );
        let id = store.add_column();
        assert_eq!(store.board().column(&id).unwrap().name, "Column 4");

        store.detach().unwrap().close().await.unwrap();
        let reloaded = KanbanStore::load(&*storage, BoardConfig::default())
            .await
            .unwrap();
        assert_eq!(reloaded.board(), store.board());
    }

    #[tokio::test]
    async fn test_reload_applies_current_config() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = KanbanStore::default();
        store.attach(Persistor::spawn(storage.clone()));
        store.add_column();
        store.detach().unwrap().close().await.unwrap();

        let config = BoardConfig {
            default_columns: vec!["Backlog".to_string()],
            column_name_prefix: "Lane".to_string(),
        };
        let mut reloaded = KanbanStore::load(&*storage, config.clone())
            .await
            .unwrap();
        assert_eq!(reloaded.board().config(), &config);
        // Saved columns survive the config change
        assert_eq!(reloaded.board().columns().len(), 4);

        let id = reloaded.add_column();
        assert_eq!(reloaded.board().column(&id).unwrap().name, "Lane 5");

        reloaded.purge(&*storage).await.unwrap();
        let names: Vec<&str> = reloaded
            .board()
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Backlog"]);
        assert_eq!(reloaded.board().column_counter(), 1);
    }

    #[tokio::test]
    async fn test_noop_commands_do_not_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = KanbanStore::default();
        store.attach(Persistor::spawn(storage.clone()));

        assert!(!store.remove_column(&ColumnId::from("missing")));
        assert!(!store.toggle_dialog());

        store.detach().unwrap().close().await.unwrap();
        assert!(!storage.is_initialized().await);
    }
}
