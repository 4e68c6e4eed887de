use thiserror::Error;

/// Errors raised by a key-value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("RocksDB error: {0}")]
    RocksDb(String),

    /// The on-disk structure is damaged; callers may attempt a repair
    #[error("store corrupted: {0}")]
    Corruption(String),
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        match e.kind() {
            rocksdb::ErrorKind::Corruption => Self::Corruption(e.into_string()),
            _ => Self::RocksDb(e.into_string()),
        }
    }
}

/// Errors raised while reading balances or applying blocks
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed balance for account {account:?}: {source}")]
    MalformedBalance {
        account: String,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode balance: {0}")]
    Encode(#[source] bincode::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
