pub mod error;
pub mod ledger;
pub mod storage;
pub mod transaction;

pub use error::{LedgerError, StorageError};
pub use ledger::{BlockOutcome, Genesis, Ledger, ReadMode};
pub use storage::{Durability, KvBackend, MemoryBackend, RocksBackend, StoreOptions, WriteBatch};
pub use transaction::{Block, Transaction};
