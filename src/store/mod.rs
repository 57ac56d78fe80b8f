//! Note store layer
//!
//! `KeepClient` keeps a local cache of notes and applies all mutations
//! there; `sync()` pushes dirty notes through a `Backend`. The backend is
//! the only blocking boundary and is treated as atomic at the call level:
//! partial writes are its concern, not the client's.

mod backend;
mod client;
mod http;
mod memory;

pub use backend::{Backend, BackendError};
pub use client::KeepClient;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
