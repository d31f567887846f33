//! Key-value stores holding the JSON-encoded session slots.

/// Durable JSON file back-end.
pub mod file;
/// Process-local back-end.
pub mod memory;

use crate::dao::storage::StorageResult;

pub use self::{file::JsonFileStore, memory::MemoryStore};

/// Abstraction over the synchronous string key-value store holding per-board session slots.
///
/// Implementations must make a value visible to `get` as soon as `set` returns.
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored at `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete `key`; deleting an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
