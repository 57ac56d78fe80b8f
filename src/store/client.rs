//! Local note cache and mutation primitives

use std::collections::HashSet;

use chrono::Utc;

use super::backend::{Backend, BackendError};
use crate::error::KeepError;
use crate::hierarchy::{self, NewListItem};
use crate::model::{ListItem, Note, SENTINEL_LABEL};
use crate::permission::MutationGuard;

/// Client over a note backend.
///
/// All mutations are applied to the local cache first and marked dirty;
/// `sync()` pushes dirty notes through the backend in one call. On a failed
/// sync the cache stays as written and remains the source of truth for the
/// next operation; there is no rollback and no retry.
pub struct KeepClient {
    backend: Box<dyn Backend>,
    guard: MutationGuard,
    notes: Vec<Note>,
    dirty: HashSet<String>,
}

impl KeepClient {
    pub fn new(backend: impl Backend + 'static, guard: MutationGuard) -> Self {
        Self {
            backend: Box::new(backend),
            guard,
            notes: Vec::new(),
            dirty: HashSet::new(),
        }
    }

    /// Replace the local cache with the backend's current notes
    pub async fn load(&mut self) -> Result<(), BackendError> {
        self.notes = self.backend.fetch_notes().await?;
        self.dirty.clear();
        tracing::info!(count = self.notes.len(), "loaded notes from backend");
        Ok(())
    }

    /// Push dirty notes to the backend.
    ///
    /// Dirty marks are cleared only on success, so a later sync retries the
    /// same set.
    pub async fn sync(&mut self) -> Result<(), BackendError> {
        if self.dirty.is_empty() {
            return Ok(());
        }
        let changed: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| self.dirty.contains(&n.id))
            .cloned()
            .collect();
        self.backend.push_notes(&changed).await?;
        self.dirty.clear();
        Ok(())
    }

    /// Notes matching a query, excluding trashed and archived ones
    pub fn find(&self, query: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| !n.trashed && !n.archived && n.matches(query))
            .collect()
    }

    /// Look up a note by id
    pub fn get(&self, note_id: &str) -> Result<&Note, KeepError> {
        self.notes
            .iter()
            .find(|n| n.id == note_id)
            .ok_or_else(|| KeepError::NoteNotFound(note_id.to_string()))
    }

    fn get_mut(&mut self, note_id: &str) -> Result<&mut Note, KeepError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| KeepError::NoteNotFound(note_id.to_string()))
    }

    fn mark_dirty(&mut self, note_id: &str) {
        self.dirty.insert(note_id.to_string());
    }

    /// Create a plain note tagged with the server's sentinel label
    pub fn create_note(&mut self, title: &str, text: &str) -> &Note {
        let mut note = Note::new_text(title, text);
        note.add_label(SENTINEL_LABEL);
        let id = note.id.clone();
        self.notes.push(note);
        self.mark_dirty(&id);
        self.notes.last().unwrap()
    }

    /// Create a checklist from client-supplied rows.
    ///
    /// Hierarchy is validated before any state changes; an `InvalidHierarchy`
    /// input leaves the cache untouched.
    pub fn create_list(&mut self, title: &str, items: &[NewListItem]) -> Result<&Note, KeepError> {
        let plan = hierarchy::plan_list(items)?;
        let mut note = Note::new_list_with_items(title, plan.build_items());
        note.add_label(SENTINEL_LABEL);
        let id = note.id.clone();
        self.notes.push(note);
        self.mark_dirty(&id);
        Ok(self.notes.last().unwrap())
    }

    /// Update a note's title and/or text
    pub fn update_note(
        &mut self,
        note_id: &str,
        title: Option<&str>,
        text: Option<&str>,
    ) -> Result<&Note, KeepError> {
        let note = self.get(note_id)?;
        self.guard.check(note)?;
        // Validate before touching anything: text updates only apply to
        // plain notes.
        if text.is_some() && note.is_list() {
            return Err(KeepError::NotATextNote(note_id.to_string()));
        }

        let note = self.get_mut(note_id)?;
        if let Some(title) = title {
            note.title = title.to_string();
        }
        if let Some(text) = text {
            if let crate::model::NoteKind::Text { text: body } = &mut note.kind {
                *body = text.to_string();
            }
        }
        note.updated = Utc::now();
        self.mark_dirty(note_id);
        self.get(note_id)
    }

    /// Mark a note trashed; physical removal is the backend's concern
    pub fn delete_note(&mut self, note_id: &str) -> Result<(), KeepError> {
        self.guard.check(self.get(note_id)?)?;

        let note = self.get_mut(note_id)?;
        note.trashed = true;
        note.updated = Utc::now();
        self.mark_dirty(note_id);
        Ok(())
    }

    /// Append an item to an existing list, optionally nested under an
    /// existing top-level item
    pub fn add_item(
        &mut self,
        note_id: &str,
        text: &str,
        checked: bool,
        parent_id: Option<&str>,
    ) -> Result<&Note, KeepError> {
        let note = self.get(note_id)?;
        if !note.is_list() {
            return Err(KeepError::NotAList(note_id.to_string()));
        }
        self.guard.check(note)?;
        if let Some(parent_id) = parent_id {
            hierarchy::validate_parent(note, parent_id)?;
        }

        let note = self.get_mut(note_id)?;
        let item = match parent_id {
            Some(pid) => ListItem::with_parent(text, checked, pid.to_string()),
            None => ListItem::new(text, checked),
        };
        let items = note
            .items_mut()
            .ok_or_else(|| KeepError::NotAList(note_id.to_string()))?;
        items.push(item);
        note.updated = Utc::now();
        self.mark_dirty(note_id);
        self.get(note_id)
    }

    /// Update text/checked on an existing item; parent links are never
    /// changed here
    pub fn update_item(
        &mut self,
        note_id: &str,
        item_id: &str,
        text: Option<&str>,
        checked: Option<bool>,
    ) -> Result<&Note, KeepError> {
        let note = self.get(note_id)?;
        if !note.is_list() {
            return Err(KeepError::NotAList(note_id.to_string()));
        }
        self.guard.check(note)?;

        let note = self.get_mut(note_id)?;
        hierarchy::apply_update(note, item_id, text, checked)?;
        note.updated = Utc::now();
        self.mark_dirty(note_id);
        self.get(note_id)
    }

    /// Remove an item from a list.
    ///
    /// Children of the removed item are promoted to top-level so their
    /// parent references never dangle.
    pub fn delete_item(&mut self, note_id: &str, item_id: &str) -> Result<&Note, KeepError> {
        let note = self.get(note_id)?;
        if !note.is_list() {
            return Err(KeepError::NotAList(note_id.to_string()));
        }
        self.guard.check(note)?;

        let note = self.get_mut(note_id)?;
        let items = note
            .items_mut()
            .ok_or_else(|| KeepError::NotAList(note_id.to_string()))?;
        let position = items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| KeepError::ItemNotFound {
                note_id: note_id.to_string(),
                item_id: item_id.to_string(),
            })?;
        items.remove(position);
        for item in items.iter_mut() {
            if item.parent_id.as_deref() == Some(item_id) {
                item.parent_id = None;
            }
        }
        note.updated = Utc::now();
        self.mark_dirty(note_id);
        self.get(note_id)
    }

    /// Number of notes with unsynced changes
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }
}
