//! Process-local slot storage.
//!
//! Nothing survives the process. Used by tests and as the fallback backend
//! when no database can be opened.

use super::{StateStorage, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStateStorage {
    slots: RefCell<BTreeMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one slot.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.slots.borrow_mut().insert(key.into(), value.into());
        storage
    }

    /// Makes subsequent writes and removals fail with `StorageError::Unavailable`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        if self.read_only.get() {
            return Err(StorageError::Unavailable(
                "memory storage is read-only".to_string(),
            ));
        }
        Ok(())
    }
}

impl StateStorage for MemoryStateStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStateStorage;
    use crate::storage::{StateStorage, StorageError};

    #[test]
    fn read_only_rejects_writes_but_keeps_reads() {
        let storage = MemoryStateStorage::with_slot("k", "v");
        storage.set_read_only(true);

        let err = storage.write("k", "other").unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
    }
}
