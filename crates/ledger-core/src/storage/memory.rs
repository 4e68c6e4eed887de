use std::collections::BTreeMap;

use super::{Durability, KvBackend, WriteBatch};
use crate::error::StorageError;

/// In-memory backend keeping keys in sorted order, like the on-disk store.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(
        &mut self,
        key: &[u8],
        value: &[u8],
        _durability: Durability,
    ) -> Result<(), StorageError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn write_batch(
        &mut self,
        batch: WriteBatch,
        _durability: Durability,
    ) -> Result<(), StorageError> {
        self.data.extend(batch);
        Ok(())
    }
}
