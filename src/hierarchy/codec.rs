//! Serialization and reconstruction of one-level item trees

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::KeepError;
use crate::model::{ListItem, Note};

/// Flat wire record for one checklist row.
///
/// Output order always matches the note's item order, so a serialize /
/// rebuild / serialize round trip is order-idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializedItem {
    pub id: String,
    pub text: String,
    pub checked: bool,
    /// Id of the parent row, omitted for top-level rows
    #[serde(rename = "superListItemId", skip_serializing_if = "Option::is_none")]
    pub super_list_item_id: Option<String>,
}

/// Client-supplied row for list creation.
///
/// `super_list_item_id` refers to the local `id` of an item appearing
/// earlier in the same input sequence, not to a pre-existing store id.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NewListItem {
    /// Caller-local key other items may reference as their parent
    #[serde(default)]
    pub id: Option<String>,
    /// Row text
    pub text: String,
    /// Checked state (default: false)
    #[serde(default)]
    pub checked: bool,
    /// Local id of the parent row, which must appear earlier in the sequence
    #[serde(rename = "superListItemId", default)]
    pub super_list_item_id: Option<String>,
}

/// A validated list creation plan.
///
/// Parent references are resolved to input positions, so applying the plan
/// cannot fail: every parent is guaranteed to have been created already.
#[derive(Debug)]
pub struct ListPlan {
    entries: Vec<PlannedItem>,
}

#[derive(Debug)]
struct PlannedItem {
    text: String,
    checked: bool,
    parent_index: Option<usize>,
}

impl ListPlan {
    /// Number of planned rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan contains no rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialize the plan into store items with freshly assigned ids,
    /// in input order.
    pub fn build_items(&self) -> Vec<ListItem> {
        let mut items: Vec<ListItem> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let item = match entry.parent_index {
                Some(idx) => {
                    // Resolvable by construction: parents precede children.
                    let parent_id = items[idx].id.clone();
                    ListItem::with_parent(entry.text.clone(), entry.checked, parent_id)
                }
                None => ListItem::new(entry.text.clone(), entry.checked),
            };
            items.push(item);
        }
        items
    }
}

/// Flatten a note's checklist into wire records, preserving item order.
///
/// Never fails: an item whose `parent_id` does not resolve to a top-level
/// row of the same note (a corrupt or externally edited note) is emitted as
/// top-level instead of failing the whole call.
pub fn serialize_items(note: &Note) -> Vec<SerializedItem> {
    let items = note.items();
    let top_level: HashSet<&str> = items
        .iter()
        .filter(|item| item.parent_id.is_none())
        .map(|item| item.id.as_str())
        .collect();

    items
        .iter()
        .map(|item| {
            let parent = item
                .parent_id
                .as_deref()
                .filter(|pid| *pid != item.id && top_level.contains(pid));
            if item.parent_id.is_some() && parent.is_none() {
                tracing::warn!(
                    item_id = %item.id,
                    "dropping dangling parent reference, emitting item as top-level"
                );
            }
            SerializedItem {
                id: item.id.clone(),
                text: item.text.clone(),
                checked: item.checked,
                super_list_item_id: parent.map(str::to_string),
            }
        })
        .collect()
}

/// Validate client-supplied rows and resolve parent references to input
/// positions.
///
/// Rejected with `InvalidHierarchy`, before any mutation:
/// - a parent reference naming an item that does not appear earlier in the
///   sequence (forward, self, or unknown references),
/// - a parent that is itself nested (Keep has no grandchildren),
/// - duplicate caller-local keys.
pub fn plan_list(items: &[NewListItem]) -> Result<ListPlan, KeepError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<PlannedItem> = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let parent_index = match item.super_list_item_id.as_deref() {
            Some(parent_key) => {
                if item.id.as_deref() == Some(parent_key) {
                    return Err(KeepError::InvalidHierarchy(format!(
                        "item '{}' references itself as parent",
                        item.text
                    )));
                }
                let idx = *seen.get(parent_key).ok_or_else(|| {
                    KeepError::InvalidHierarchy(format!(
                        "item '{}' references parent '{}' which does not appear earlier in the list",
                        item.text, parent_key
                    ))
                })?;
                if entries[idx].parent_index.is_some() {
                    return Err(KeepError::InvalidHierarchy(format!(
                        "item '{}' references parent '{}' which is itself nested; \
                         lists support one level of nesting",
                        item.text, parent_key
                    )));
                }
                Some(idx)
            }
            None => None,
        };

        if let Some(key) = item.id.as_deref() {
            if seen.insert(key, index).is_some() {
                return Err(KeepError::InvalidHierarchy(format!(
                    "duplicate item id '{}'",
                    key
                )));
            }
        }

        entries.push(PlannedItem {
            text: item.text.clone(),
            checked: item.checked,
            parent_index,
        });
    }

    Ok(ListPlan { entries })
}

/// Check that `parent_id` names an existing top-level item of the note.
///
/// Used when appending a single item to an existing list, where the parent
/// reference is a real store id.
pub fn validate_parent(note: &Note, parent_id: &str) -> Result<(), KeepError> {
    let parent = note
        .items()
        .iter()
        .find(|item| item.id == parent_id)
        .ok_or_else(|| KeepError::ItemNotFound {
            note_id: note.id.clone(),
            item_id: parent_id.to_string(),
        })?;
    if parent.parent_id.is_some() {
        return Err(KeepError::InvalidHierarchy(format!(
            "item '{}' is itself nested; lists support one level of nesting",
            parent_id
        )));
    }
    Ok(())
}

/// Update text and/or checked state of an existing item by id.
///
/// Never touches `parent_id`; re-parenting is not supported.
pub fn apply_update(
    note: &mut Note,
    item_id: &str,
    text: Option<&str>,
    checked: Option<bool>,
) -> Result<(), KeepError> {
    let note_id = note.id.clone();
    let items = note.items_mut().ok_or(KeepError::NotAList(note_id.clone()))?;
    let item = items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| KeepError::ItemNotFound {
            note_id,
            item_id: item_id.to_string(),
        })?;

    if let Some(text) = text {
        item.text = text.to_string();
    }
    if let Some(checked) = checked {
        item.checked = checked;
    }
    Ok(())
}
