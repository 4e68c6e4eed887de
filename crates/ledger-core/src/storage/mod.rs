//! Key-value storage backends.
//!
//! - `RocksBackend`: persistent RocksDB store used by the benchmark
//! - `MemoryBackend`: ordered in-memory map for tests and reference replays

mod memory;
mod rocks;

pub use memory::MemoryBackend;
pub use rocks::{RocksBackend, StoreOptions};

use crate::error::StorageError;

/// Whether a write must reach stable storage before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    /// Leave flushing to the store.
    #[default]
    Buffered,
    /// Flush and fsync before returning.
    Sync,
}

impl Durability {
    pub const fn is_sync(self) -> bool {
        matches!(self, Self::Sync)
    }
}

/// Ordered key-value store with atomic batch writes.
pub trait KvBackend {
    /// Get a value by key; `None` when the key was never written.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    fn put(&mut self, key: &[u8], value: &[u8], durability: Durability)
        -> Result<(), StorageError>;

    /// Apply every put in `batch` as a single atomic write.
    fn write_batch(&mut self, batch: WriteBatch, durability: Durability)
        -> Result<(), StorageError>;

    /// Flush any buffered data to disk (if applicable).
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Puts staged for one atomic write. Later puts to the same key win.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    puts: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.puts.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.puts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.puts.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl IntoIterator for WriteBatch {
    type Item = (Vec<u8>, Vec<u8>);
    type IntoIter = std::vec::IntoIter<(Vec<u8>, Vec<u8>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.puts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn check_point_ops<B: KvBackend>(mut backend: B) {
        assert!(backend.get(b"missing").unwrap().is_none());

        backend.put(b"key1", b"value1", Durability::Sync).unwrap();
        assert_eq!(backend.get(b"key1").unwrap(), Some(b"value1".to_vec()));

        backend.put(b"key1", b"value2", Durability::Buffered).unwrap();
        assert_eq!(backend.get(b"key1").unwrap(), Some(b"value2".to_vec()));
    }

    fn check_batch_last_put_wins<B: KvBackend>(mut backend: B) {
        let mut batch = WriteBatch::new();
        batch.put(b"x".to_vec(), b"1".to_vec());
        batch.put(b"y".to_vec(), b"2".to_vec());
        batch.put(b"x".to_vec(), b"3".to_vec());
        assert_eq!(batch.len(), 3);

        backend.write_batch(batch, Durability::Sync).unwrap();

        assert_eq!(backend.get(b"x").unwrap(), Some(b"3".to_vec()));
        assert_eq!(backend.get(b"y").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_memory_backend_point_ops() {
        check_point_ops(MemoryBackend::new());
    }

    #[test]
    fn test_memory_backend_batch() {
        check_batch_last_put_wins(MemoryBackend::new());
    }

    #[test]
    fn test_rocks_backend_point_ops() {
        let dir = TempDir::new().unwrap();
        check_point_ops(RocksBackend::open(dir.path()).unwrap());
    }

    #[test]
    fn test_rocks_backend_batch() {
        let dir = TempDir::new().unwrap();
        check_batch_last_put_wins(RocksBackend::open(dir.path()).unwrap());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut backend = MemoryBackend::new();
        backend.write_batch(WriteBatch::new(), Durability::Sync).unwrap();
        assert!(backend.is_empty());
    }
}
