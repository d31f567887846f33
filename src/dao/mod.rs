/// Storage key namespace resolution.
pub mod keys;
/// Key-value store abstraction and its back-ends.
pub mod kv_store;
/// Persisted slot shapes.
pub mod models;
/// Team roster slot persistence.
pub mod roster_store;
/// JSON slot read/write helpers shared by the typed stores.
pub mod slot;
/// Start state slot persistence.
pub mod start_store;
/// Storage error types.
pub mod storage;
/// Used cell slot persistence.
pub mod used_cells_store;
