//! RocksDB key-value backend.

use std::path::Path;

use rocksdb::{BlockBasedOptions, Cache, DBCompressionType, Options, WriteOptions, DB};
use tracing::{info, warn};

use super::{Durability, KvBackend, WriteBatch};
use crate::error::StorageError;

/// Table and cache tuning for the on-disk store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub cache_bytes: usize,
    pub block_size: usize,
    pub block_restart_interval: i32,
    pub compression: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            cache_bytes: 8 * 1024 * 1024,
            block_size: 4 * 1024,
            block_restart_interval: 16,
            compression: true,
        }
    }
}

impl StoreOptions {
    fn to_rocks(self) -> Options {
        let mut table = BlockBasedOptions::default();
        table.set_block_size(self.block_size);
        table.set_block_restart_interval(self.block_restart_interval);
        table.set_block_cache(&Cache::new_lru_cache(self.cache_bytes));

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(if self.compression {
            DBCompressionType::Snappy
        } else {
            DBCompressionType::None
        });
        opts.set_block_based_table_factory(&table);
        opts
    }
}

/// Persistent backend. The database closes when the backend is dropped.
pub struct RocksBackend {
    db: DB,
}

impl RocksBackend {
    /// Open or create a database at `path` with default tuning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open or create a database at `path`.
    ///
    /// A corrupted store gets one repair attempt followed by a second open;
    /// if that open fails too, its error is returned.
    pub fn open_with<P: AsRef<Path>>(
        path: P,
        options: StoreOptions,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let opts = options.to_rocks();

        let db = open_or_repair(
            || Ok(DB::open(&opts, path)?),
            |reason| {
                warn!(path = %path.display(), %reason, "store corrupted, attempting repair");
                Ok(DB::repair(&opts, path)?)
            },
        )?;

        info!(path = %path.display(), "opened store");
        Ok(Self { db })
    }

    /// Flush memtables and release the database handle.
    pub fn close(self) -> Result<(), StorageError> {
        self.flush()
    }

    fn write_options(durability: Durability) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(durability.is_sync());
        opts
    }
}

impl KvBackend for RocksBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key)?)
    }

    fn put(
        &mut self,
        key: &[u8],
        value: &[u8],
        durability: Durability,
    ) -> Result<(), StorageError> {
        self.db.put_opt(key, value, &Self::write_options(durability))?;
        Ok(())
    }

    fn write_batch(
        &mut self,
        batch: WriteBatch,
        durability: Durability,
    ) -> Result<(), StorageError> {
        let mut rocks_batch = rocksdb::WriteBatch::default();
        for (key, value) in batch.iter() {
            rocks_batch.put(key, value);
        }
        self.db.write_opt(rocks_batch, &Self::write_options(durability))?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

/// Run `open`; on a corruption error run `repair` once and open again.
/// Any other error, and any error from the second open, is returned as is.
fn open_or_repair<T>(
    mut open: impl FnMut() -> Result<T, StorageError>,
    repair: impl FnOnce(&str) -> Result<(), StorageError>,
) -> Result<T, StorageError> {
    match open() {
        Err(StorageError::Corruption(reason)) => {
            repair(&reason)?;
            open()
        }
        result => result,
    }
}
