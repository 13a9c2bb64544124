//! In-process slot store.
//!
//! Backs tests and scratch sessions. `set_failing(true)` makes every call
//! return `RepoError::Unavailable`, mimicking a full or broken backend.

use crate::repo::slot_store::{validate_slot_key, RepoError, RepoResult, SlotStore};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<BTreeMap<String, String>>,
    failing: Cell<bool>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Snapshot of the raw slot contents, bypassing failure mode.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    fn check(&self, key: &str) -> RepoResult<()> {
        validate_slot_key(key)?;
        if self.failing.get() {
            return Err(RepoError::Unavailable("memory store in failing mode".to_string()));
        }
        Ok(())
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.check(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.check(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.check(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySlotStore;
    use crate::repo::slot_store::{RepoError, SlotStore};

    #[test]
    fn set_get_remove() {
        let store = MemorySlotStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn failing_mode_rejects_calls_but_keeps_data() {
        let store = MemorySlotStore::new();
        store.set("a", "1").unwrap();
        store.set_failing(true);
        assert!(matches!(store.get("a"), Err(RepoError::Unavailable(_))));
        assert_eq!(store.raw("a").as_deref(), Some("1"));
    }
}
