use std::sync::Arc;

use crate::{
    dao::{
        kv_store::KeyValueStore,
        models::StartStateEntity,
        slot::{log_fallback, read_slot, remove_slot, write_slot},
    },
    state::{decode::Decoded, state_machine::StartState},
};

/// Persistence of a board's start/setup state.
#[derive(Clone)]
pub struct StartStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl StartStore {
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

    /// Load the start state; anything unusable yields `{started: false, teamCount: fallback}`.
    pub fn load(&self, fallback_count: i64) -> Decoded<StartState> {
        match read_slot::<StartStateEntity>(self.store.as_ref(), &self.key) {
            Ok(entity) => Decoded::Ok(StartState::from_entity(entity, fallback_count)),
            Err(reason) => {
                log_fallback(&self.key, &reason);
                Decoded::fallback(StartState::initial(fallback_count), reason)
            }
        }
    }

    /// Persist `state`; failures are logged.
    pub fn save(&self, state: StartState) {
        write_slot(self.store.as_ref(), &self.key, &state.to_entity());
    }

    /// Remove the slot.
    pub fn clear(&self) {
        remove_slot(self.store.as_ref(), &self.key);
    }
}
