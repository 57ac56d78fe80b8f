//! Note and list item structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One checklist row.
///
/// `parent_id`, when present, nests this row one level under another row of
/// the same note. Keep supports exactly one level of nesting; a child can
/// never itself be a parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListItem {
    /// Stable identifier, unique within the note
    pub id: String,
    /// Row text
    pub text: String,
    /// Checked state
    pub checked: bool,
    /// Id of the parent row, absent for top-level rows
    pub parent_id: Option<String>,
}

impl ListItem {
    /// Create a top-level item with a generated id
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            checked,
            parent_id: None,
        }
    }

    /// Create an item nested under an existing row
    pub fn with_parent(text: impl Into<String>, checked: bool, parent_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            checked,
            parent_id: Some(parent_id),
        }
    }
}

/// Body of a note: freeform text or an ordered checklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteKind {
    Text { text: String },
    List { items: Vec<ListItem> },
}

/// A Keep note as cached by the store client.
///
/// Items are owned exclusively by their note; parent references never cross
/// note boundaries. Deletion is a `trashed` mark, physical removal is the
/// backend's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub kind: NoteKind,
    pub labels: Vec<String>,
    pub pinned: bool,
    pub archived: bool,
    pub trashed: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Note {
    /// Create a plain text note with a generated id
    pub fn new_text(title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            kind: NoteKind::Text { text: text.into() },
            labels: Vec::new(),
            pinned: false,
            archived: false,
            trashed: false,
            created: now,
            updated: now,
        }
    }

    /// Create an empty checklist note with a generated id
    pub fn new_list(title: impl Into<String>) -> Self {
        Self::new_list_with_items(title, Vec::new())
    }

    /// Create a checklist note with its items
    pub fn new_list_with_items(title: impl Into<String>, items: Vec<ListItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            kind: NoteKind::List { items },
            labels: Vec::new(),
            pinned: false,
            archived: false,
            trashed: false,
            created: now,
            updated: now,
        }
    }

    /// Whether this note is a checklist
    pub fn is_list(&self) -> bool {
        matches!(self.kind, NoteKind::List { .. })
    }

    /// Checklist items, empty slice for text notes
    pub fn items(&self) -> &[ListItem] {
        match &self.kind {
            NoteKind::List { items } => items,
            NoteKind::Text { .. } => &[],
        }
    }

    /// Mutable checklist items, `None` for text notes
    pub fn items_mut(&mut self) -> Option<&mut Vec<ListItem>> {
        match &mut self.kind {
            NoteKind::List { items } => Some(items),
            NoteKind::Text { .. } => None,
        }
    }

    /// Freeform text, `None` for lists
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NoteKind::Text { text } => Some(text),
            NoteKind::List { .. } => None,
        }
    }

    /// Check if the note carries a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Add a label if not already present
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.has_label(&label) {
            self.labels.push(label);
        }
    }

    /// Case-insensitive match of a query against title and body
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        if self.title.to_lowercase().contains(&query) {
            return true;
        }
        match &self.kind {
            NoteKind::Text { text } => text.to_lowercase().contains(&query),
            NoteKind::List { items } => items
                .iter()
                .any(|item| item.text.to_lowercase().contains(&query)),
        }
    }
}
