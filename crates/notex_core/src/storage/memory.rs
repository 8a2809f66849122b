//! In-process `KeyValueStore`, used for tests and throwaway sessions.

use super::{KeyValueStore, StorageResult};
use std::collections::BTreeMap;

/// Map-backed slot store. Cloning snapshots the current contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKeyValueStore {
    items: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryKeyValueStore {
    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}
