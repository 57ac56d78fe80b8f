//! Tool response types
//!
//! Notes are returned to MCP clients as JSON. Checklists carry their items
//! in the flat, order-preserving wire form produced by the hierarchy codec.

use serde::Serialize;

use crate::hierarchy::{serialize_items, SerializedItem};
use crate::model::Note;

/// JSON view of a note as returned by every tool
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SerializedItem>>,
    pub labels: Vec<String>,
    pub pinned: bool,
    pub archived: bool,
    pub trashed: bool,
}

impl NoteView {
    pub fn from_note(note: &Note) -> Self {
        let items = if note.is_list() {
            Some(serialize_items(note))
        } else {
            None
        };
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            text: note.text().map(str::to_string),
            items,
            labels: note.labels.clone(),
            pinned: note.pinned,
            archived: note.archived,
            trashed: note.trashed,
        }
    }
}

/// Confirmation payload for delete_note
#[derive(Debug, Clone, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    pub fn for_note(note_id: &str) -> Self {
        Self {
            message: format!("Note {} marked for deletion", note_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, Note};

    #[test]
    fn test_text_note_view() {
        let note = Note::new_text("Title", "Body");
        let view = NoteView::from_note(&note);
        assert_eq!(view.text.as_deref(), Some("Body"));
        assert!(view.items.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("items").is_none());
        assert_eq!(json["title"], "Title");
    }

    #[test]
    fn test_list_note_view_includes_hierarchy() {
        let mut note = Note::new_list("Groceries");
        let parent = ListItem::new("Produce", false);
        let child = ListItem::with_parent("Apples", false, parent.id.clone());
        *note.items_mut().unwrap() = vec![parent.clone(), child];

        let view = NoteView::from_note(&note);
        let items = view.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].super_list_item_id.as_deref(), Some(parent.id.as_str()));

        let json = serde_json::to_value(NoteView::from_note(&note)).unwrap();
        assert_eq!(json["items"][1]["superListItemId"], parent.id.as_str());
        assert!(json["items"][0].get("superListItemId").is_none());
    }

    #[test]
    fn test_delete_confirmation() {
        let confirmation = DeleteConfirmation::for_note("abc");
        assert!(confirmation.message.contains("abc"));
    }
}
