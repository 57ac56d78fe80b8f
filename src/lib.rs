//! keep-mcp: Google Keep MCP server
//!
//! Exposes Keep note and checklist operations as MCP tools over stdio.
//! Checklist hierarchy (one level of parent/child nesting) is flattened
//! into order-preserving wire records and reconstructed on creation.
//!
//! # Modules
//!
//! - `config`: TOML + environment configuration
//! - `model`: note and list item data structures
//! - `hierarchy`: checklist serialization and reconstruction
//! - `store`: local note cache and backend sync
//! - `permission`: sentinel-label mutation gate
//! - `mcp`: tool response types (the rmcp server lives in main.rs)

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod mcp;
pub mod model;
pub mod permission;
pub mod store;

// Re-export commonly used types
pub use error::KeepError;
pub use model::{ListItem, Note, NoteKind, SENTINEL_LABEL};
pub use permission::MutationGuard;
pub use store::KeepClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_exists() {
        assert_eq!(NAME, "keep-mcp");
    }
}
