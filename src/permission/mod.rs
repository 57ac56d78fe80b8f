//! Mutation permission gate
//!
//! Destructive tools only touch notes this server created, identified by the
//! sentinel label, unless UNSAFE_MODE was enabled at startup. The flag is
//! injected at construction time rather than read from the environment in
//! deep call paths.

use crate::error::KeepError;
use crate::model::Note;

/// Gate checked before every create/update/delete against an existing note
#[derive(Debug, Clone, Copy)]
pub struct MutationGuard {
    unsafe_mode: bool,
}

impl MutationGuard {
    pub fn new(unsafe_mode: bool) -> Self {
        Self { unsafe_mode }
    }

    /// Whether the sentinel-label restriction is disabled
    pub fn unsafe_mode(&self) -> bool {
        self.unsafe_mode
    }

    /// Pure predicate: may this note be mutated?
    pub fn can_modify(&self, note: &Note) -> bool {
        self.unsafe_mode || note.has_label(crate::model::SENTINEL_LABEL)
    }

    /// Fail with `PermissionDenied` unless the note may be mutated.
    ///
    /// Called before any state change, so a denial leaves the store
    /// untouched.
    pub fn check(&self, note: &Note) -> Result<(), KeepError> {
        if self.can_modify(note) {
            Ok(())
        } else {
            Err(KeepError::PermissionDenied(note.id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, SENTINEL_LABEL};

    #[test]
    fn test_denies_unlabeled_note() {
        let guard = MutationGuard::new(false);
        let note = Note::new_text("t", "x");
        assert!(!guard.can_modify(&note));
        assert!(matches!(
            guard.check(&note),
            Err(KeepError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_allows_labeled_note() {
        let guard = MutationGuard::new(false);
        let mut note = Note::new_text("t", "x");
        note.add_label(SENTINEL_LABEL);
        assert!(guard.check(&note).is_ok());
    }

    #[test]
    fn test_unsafe_mode_bypasses_label() {
        let guard = MutationGuard::new(true);
        let note = Note::new_text("t", "x");
        assert!(guard.check(&note).is_ok());
    }
}
