use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    dao::{
        kv_store::KeyValueStore,
        models::UsedCellsEntity,
        slot::{log_fallback, read_slot, remove_slot, write_slot},
    },
    state::{
        decode::Decoded,
        used_cells::{CellCoord, UsedCellSet},
    },
};

/// Write-through persistence of a board's used-cell set.
#[derive(Clone)]
pub struct UsedCellStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl UsedCellStore {
    /// Store bound to the slot at `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Slot key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted set. A missing, non-array or corrupt slot yields an empty set; array
    /// entries that are not `"row:col"` keys are skipped.
    pub fn load(&self) -> Decoded<UsedCellSet> {
        let entries = match read_slot::<UsedCellsEntity>(self.store.as_ref(), &self.key) {
            Ok(entries) => entries,
            Err(reason) => {
                log_fallback(&self.key, &reason);
                return Decoded::fallback(UsedCellSet::new(), reason);
            }
        };

        let cells: Vec<CellCoord> = entries
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|key| key.parse().ok())
            .collect();
        if cells.len() != entries.len() {
            debug!(
                key = %self.key,
                skipped = entries.len() - cells.len(),
                "ignored invalid used-cell entries"
            );
        }

        Decoded::Ok(cells.into_iter().collect())
    }

    /// Persist the full set as an array of `"row:col"` keys.
    pub fn save(&self, set: &UsedCellSet) {
        write_slot(self.store.as_ref(), &self.key, &set.to_keys());
    }

    /// Mark a cell as used. Persists only when the cell was not already in the set; returns
    /// whether it was newly added.
    pub fn mark_used(&self, set: &mut UsedCellSet, row: u32, col: u32) -> bool {
        if !set.insert(row, col) {
            return false;
        }
        self.save(set);
        true
    }

    /// Whether the cell at `row`, `col` is in `set`.
    pub fn is_used(&self, set: &UsedCellSet, row: u32, col: u32) -> bool {
        set.contains(row, col)
    }

    /// Drop the persisted slot and return a fresh empty set.
    pub fn clear(&self) -> UsedCellSet {
        remove_slot(self.store.as_ref(), &self.key);
        UsedCellSet::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::kv_store::MemoryStore, state::decode::FallbackReason};

    const KEY: &str = "boards.play.test.used";

    fn store_with(raw: Option<&str>) -> (Arc<MemoryStore>, UsedCellStore) {
        let memory = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            memory.set(KEY, raw).unwrap();
        }
        let used_store = UsedCellStore::new(memory.clone(), KEY);
        (memory, used_store)
    }

    #[test]
    fn mark_used_twice_matches_once() {
        let (memory, store) = store_with(None);
        let mut once = UsedCellSet::new();
        store.mark_used(&mut once, 1, 2);

        let mut twice = UsedCellSet::new();
        assert!(store.mark_used(&mut twice, 1, 2));
        assert!(!store.mark_used(&mut twice, 1, 2));

        assert_eq!(once, twice);
        assert!(store.is_used(&twice, 1, 2));
        assert_eq!(memory.get(KEY).unwrap().as_deref(), Some("[\"1:2\"]"));
    }

    #[test]
    fn load_sees_latest_mark() {
        let (_, store) = store_with(None);
        let mut set = store.load().into_value();
        store.mark_used(&mut set, 0, 0);
        store.mark_used(&mut set, 3, 1);
        assert_eq!(store.load(), Decoded::Ok(set));
    }

    #[test]
    fn corrupt_slots_yield_empty_set() {
        for raw in ["not json", "42", "null", "{\"0:0\":true}", "\"0:0\""] {
            let (_, store) = store_with(Some(raw));
            let loaded = store.load();
            assert!(loaded.is_fallback(), "{raw}");
            assert!(loaded.value().is_empty(), "{raw}");
        }

        let (_, store) = store_with(None);
        assert_eq!(store.load().reason(), Some(&FallbackReason::Missing));
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let (_, store) = store_with(Some(r#"["0:0", 7, "x:y", "2:1", "0:0"]"#));
        let loaded = store.load();
        assert!(!loaded.is_fallback());
        assert_eq!(loaded.value().to_keys(), ["0:0", "2:1"]);
    }

    #[test]
    fn clear_removes_slot() {
        let (memory, store) = store_with(Some(r#"["0:0"]"#));
        assert!(store.clear().is_empty());
        assert!(memory.get(KEY).unwrap().is_none());
        assert!(store.load().value().is_empty());
    }
}
