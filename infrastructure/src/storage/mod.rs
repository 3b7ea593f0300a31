//! Persistence adapters.
//!
//! [`FileChatStore`] / [`FileUserStore`] keep their working set in memory
//! behind an async RwLock and rewrite a JSON file on every mutation;
//! [`MemoryChatStore`] / [`MemoryUserStore`] back tests and ephemeral runs.

mod file;
mod memory;

pub use file::{FileChatStore, FileUserStore};
pub use memory::{MemoryChatStore, MemoryUserStore};
