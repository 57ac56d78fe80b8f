//! Note data model
//!
//! Typed representations of Keep notes and checklist items. Field presence
//! is declared up front; optional-field handling happens once at the tool
//! boundary, not inside the codec.

mod note;

pub use note::{ListItem, Note, NoteKind};

/// Label applied to every note this server creates.
///
/// The permission gate uses it to scope default mutation rights to notes the
/// server owns.
pub const SENTINEL_LABEL: &str = "keep-mcp";
