//! JSON encode/decode over slots with best-effort semantics.
//!
//! # Invariants
//! - Loads never fail: missing, unreadable or unparsable slots yield `None`.
//! - Saves never fail: errors are logged and reported as `false`.
//! - List slots decode record by record; one bad record never hides the rest.

use crate::repo::slot_store::SlotStore;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads and decodes one slot.
pub fn load_json<T: DeserializeOwned>(store: &impl SlotStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            error!("event=slot_load module=repo status=error key={key} error={err}");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=corrupt key={key} bytes={} error={err}",
                raw.len()
            );
            None
        }
    }
}

/// Reads a JSON array slot, keeping every record that decodes.
///
/// Records that fail to decode are skipped with a warning. A slot that is not
/// an array at all loads as `None`.
pub fn load_json_records<T: DeserializeOwned>(store: &impl SlotStore, key: &str) -> Option<Vec<T>> {
    let raw: Vec<serde_json::Value> = load_json(store, key)?;
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("event=slot_load module=repo status=skipped key={key} index={index} error={err}");
                None
            }
        })
        .collect();
    if records.len() < total {
        warn!(
            "event=slot_load module=repo status=partial key={key} kept={} dropped={}",
            records.len(),
            total - records.len()
        );
    }
    Some(records)
}

/// Encodes and writes one slot. Returns whether the write landed.
pub fn save_json<T: Serialize + ?Sized>(store: &impl SlotStore, key: &str, value: &T) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            error!("event=slot_save module=repo status=error key={key} error_code=encode_failed error={err}");
            return false;
        }
    };

    match store.set(key, &raw) {
        Ok(()) => true,
        Err(err) => {
            error!("event=slot_save module=repo status=error key={key} error_code=write_failed error={err}");
            false
        }
    }
}

/// Removes one slot, logging failures.
pub fn remove_slot(store: &impl SlotStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(err) => {
            error!("event=slot_remove module=repo status=error key={key} error={err}");
            false
        }
    }
}
