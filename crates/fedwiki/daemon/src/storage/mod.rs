//! Storage layer for the wiki daemon
//!
//! Persists pages and site ownership status.

mod filesystem;
mod memory;
mod traits;

pub use filesystem::FileStorage;
pub use memory::InMemoryStorage;
pub use traits::{PageStorage, StatusStorage, Storage, StorageResult, StoredPage};
