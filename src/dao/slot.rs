//! Shared read/write helpers for JSON-encoded session slots.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::{dao::kv_store::KeyValueStore, state::decode::FallbackReason};

/// Read and decode the slot at `key`. Every failure is reported as a [`FallbackReason`] so the
/// caller can substitute its default.
pub fn read_slot<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, FallbackReason>
where
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return Err(FallbackReason::Missing),
        Err(err) => return Err(FallbackReason::Unreadable(err.to_string())),
    };

    let value = serde_json::from_str::<Value>(&raw)
        .map_err(|err| FallbackReason::Malformed(err.to_string()))?;
    serde_json::from_value::<T>(value).map_err(|err| FallbackReason::WrongShape(err.to_string()))
}

/// Encode and persist `value` at `key`. Failures are logged and otherwise ignored.
pub fn write_slot<T>(store: &dyn KeyValueStore, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(key, error = %err, "failed to encode session slot");
            return;
        }
    };

    if let Err(err) = store.set(key, &payload) {
        warn!(key, error = %err, "failed to persist session slot");
    }
}

/// Remove the slot at `key`, logging failures.
pub fn remove_slot(store: &dyn KeyValueStore, key: &str) {
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to remove session slot");
    }
}

/// Log a fallback unless the slot was simply absent.
pub fn log_fallback(key: &str, reason: &FallbackReason) {
    if !matches!(reason, FallbackReason::Missing) {
        warn!(key, reason = %reason, "persisted session slot unusable; using defaults");
    }
}
