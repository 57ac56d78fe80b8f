//! MCP server support types
//!
//! The rmcp tool implementation lives in main.rs; this module holds the
//! JSON view types returned by the tools.

mod server;

pub use server::{DeleteConfirmation, NoteView};
