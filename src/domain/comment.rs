use crate::domain::{
    ids::{CommentId, ItemId},
    item::Item,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A comment on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Parent comment, reserved for threading. Always `None` today.
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    pub content: String,
    #[serde(default)]
    pub edited: bool,
}

impl Comment {
    pub fn new(content: String, parent_id: Option<CommentId>) -> Self {
        Self {
            id: CommentId::generate(),
            parent_id,
            content,
            edited: false,
        }
    }
}

/// Comments keyed by item, plus the item-detail dialog state.
///
/// Comments are not removed when their item or column is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStore {
    #[serde(default)]
    pub(crate) comments: HashMap<ItemId, Vec<Comment>>,
    #[serde(skip)]
    current_item: Option<Item>,
    #[serde(skip)]
    dialog_open: bool,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores persisted comments with the dialog closed
    pub fn with_comments(comments: HashMap<ItemId, Vec<Comment>>) -> Self {
        Self {
            comments,
            ..Self::default()
        }
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current_item.as_ref()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Flips dialog visibility. Closing always clears the current item;
    /// opening needs one, so a toggle with nothing selected does nothing.
    pub fn toggle_dialog(&mut self) -> bool {
        if !self.dialog_open && self.current_item.is_none() {
            trace!("toggle_dialog: no current item to open");
            return false;
        }

        self.dialog_open = !self.dialog_open;
        if !self.dialog_open {
            self.current_item = None;
        }
        debug!(open = self.dialog_open, "dialog toggled");
        true
    }

    pub fn set_current_item(&mut self, item: Item) {
        debug!(item_id = %item.id, "current item set");
        self.current_item = Some(item);
    }

    /// Selects the item and makes sure the dialog is showing
    pub fn open_dialog(&mut self, item: Item) {
        self.set_current_item(item);
        if !self.dialog_open {
            self.toggle_dialog();
        }
    }

    /// Closes the dialog if it is open
    pub fn close_dialog(&mut self) {
        if self.dialog_open {
            self.toggle_dialog();
        }
    }

    /// Every comment thread, keyed by item
    pub fn threads(&self) -> &HashMap<ItemId, Vec<Comment>> {
        &self.comments
    }

    pub fn comments_for(&self, item_id: &ItemId) -> &[Comment] {
        self.comments
            .get(item_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a comment to the item's thread, creating it if needed
    pub fn add_comment(
        &mut self,
        item_id: &ItemId,
        content: String,
        parent_id: Option<CommentId>,
    ) -> CommentId {
        let comment = Comment::new(content, parent_id);
        let id = comment.id.clone();

        self.comments
            .entry(item_id.clone())
            .or_default()
            .push(comment);
        debug!(item_id = %item_id, comment_id = %id, "comment added");
        id
    }

    /// Replaces a comment's content and marks it edited
    pub fn edit_comment(&mut self, item_id: &ItemId, comment_id: &CommentId, content: String) -> bool {
        let Some(comment) = self
            .comments
            .get_mut(item_id)
            .and_then(|thread| thread.iter_mut().find(|c| &c.id == comment_id))
        else {
            trace!(item_id = %item_id, comment_id = %comment_id, "edit_comment: comment not found");
            return false;
        };

        comment.content = content;
        comment.edited = true;
        debug!(item_id = %item_id, comment_id = %comment_id, "comment edited");
        true
    }

    pub fn delete_comment(&mut self, item_id: &ItemId, comment_id: &CommentId) -> bool {
        let Some(thread) = self.comments.get_mut(item_id) else {
            trace!(item_id = %item_id, "delete_comment: no comments for item");
            return false;
        };
        let Some(pos) = thread.iter().position(|c| &c.id == comment_id) else {
            trace!(item_id = %item_id, comment_id = %comment_id, "delete_comment: comment not found");
            return false;
        };

        thread.remove(pos);
        debug!(item_id = %item_id, comment_id = %comment_id, "comment deleted");
        true
    }

    /// Drops comments and dialog state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
